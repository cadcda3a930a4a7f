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

//! Stash Core - flat-directory file storage.
//!
//! This crate provides the storage layer for Stash:
//! - A [`FileStore`] over a single local directory
//! - Filename sanitization and traversal containment
//! - Aggregate disk-usage scanning for metrics

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::filename::sanitize_filename;
pub use store::{FileStore, StorageUsage};
