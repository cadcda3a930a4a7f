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

//! Filename sanitization and containment checks.

use std::io;
use std::path::Path;

use crate::error::StoreError;

/// Strips directory components from a client-supplied name and returns the
/// final path segment.
///
/// Splits on both separators since Windows clients send backslashes.
/// Rejects names that reduce to nothing, `.`, or `..`.
pub fn sanitize_filename(raw: &str) -> Result<String, StoreError> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or("");
    if name.is_empty() || name == "." || name == ".." {
        return Err(StoreError::InvalidFilename {
            name: raw.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Returns true if `name` is a plain single-segment filename.
///
/// Route matching keeps literal `/` out of path segments; this guards the
/// percent-encoded variants that decode back into separators.
pub fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Verifies that `path` canonicalizes to a descendant of `root`.
///
/// Canonicalization resolves symlinks, so a link inside the root that
/// points elsewhere fails the check. Both paths must exist.
pub fn is_contained(root: &Path, path: &Path) -> io::Result<bool> {
    let root = root.canonicalize()?;
    let path = path.canonicalize()?;
    Ok(path.starts_with(&root))
}
