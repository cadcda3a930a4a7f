// Copyright 2026 Stash Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for the file store.

use thiserror::Error;

/// Errors that can occur in the file store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The name is empty, `.`, `..`, or does not stay inside the storage root.
    #[error("Invalid filename: {name:?}")]
    InvalidFilename {
        /// Name that was rejected.
        name: String,
    },

    /// No file with this name exists in the storage root.
    #[error("File '{name}' not found")]
    NotFound {
        /// Name that was requested.
        name: String,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
