//! Ownership attribute queries against a snapshot

use std::path::Path;

use ownreview_domain::{OwnerDeclaration, Repository};

use crate::{GitCommand, GitError, GitRunner, IndexSnapshot, GIT_INDEX_FILE};

/// Attribute that lists a path's owners
pub const DEFAULT_ATTRIBUTE: &str = "owners";

/// Values git reports for an attribute that carries no owner list
const NO_VALUE: [&str; 3] = ["unspecified", "unset", "set"];

/// Reads the owners attribute of single paths
///
/// Runs `git check-attr -z --cached <attribute> -- <path>` with the snapshot
/// as index, so `.gitattributes` are taken from the snapshot's revision.
#[derive(Debug, Clone)]
pub struct AttributeQuery<G> {
    git: G,
    attribute: String,
}

impl<G: GitRunner> AttributeQuery<G> {
    /// Create a query for `attribute`
    pub fn new(git: G, attribute: impl Into<String>) -> Self {
        Self {
            git,
            attribute: attribute.into(),
        }
    }

    /// The attribute being queried
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Owner declarations for `path`, empty when the attribute is not set
    ///
    /// Fails with [`GitError::QueryExecution`] only when git itself could not
    /// answer.
    pub fn owners_for(
        &self,
        repository: &Repository,
        snapshot: &IndexSnapshot,
        path: impl AsRef<Path>,
    ) -> Result<Vec<OwnerDeclaration>, GitError> {
        let path = path.as_ref();
        let command = GitCommand::new("check-attr")
            .args(["-z", "--cached", self.attribute.as_str(), "--"])
            .arg(path)
            .env(GIT_INDEX_FILE, snapshot.index_path());

        let output = self
            .git
            .run(repository, &command)
            .map_err(|e| GitError::QueryExecution {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let value = parse_check_attr(&output.stdout, &self.attribute).map_err(|e| {
            GitError::QueryExecution {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(value
            .map(|v| OwnerDeclaration::parse_list(&v))
            .unwrap_or_default())
    }
}

/// Extract the value of `attribute` from `git check-attr -z` output
///
/// The output is a sequence of `<path> NUL <attribute> NUL <value> NUL`
/// records. Returns `None` when the attribute is unspecified, unset, or set
/// without a value.
///
/// # Examples
///
/// ```
/// use ownreview_git::parse_check_attr;
///
/// let out = b"a.txt\0owners\0alice bob\0";
/// assert_eq!(parse_check_attr(out, "owners").unwrap().as_deref(), Some("alice bob"));
///
/// let out = b"b.txt\0owners\0unspecified\0";
/// assert_eq!(parse_check_attr(out, "owners").unwrap(), None);
/// ```
pub fn parse_check_attr(output: &[u8], attribute: &str) -> Result<Option<String>, GitError> {
    let mut fields: Vec<&[u8]> = output.split(|b| *b == 0).collect();
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() % 3 != 0 {
        return Err(GitError::InvalidOutput(format!(
            "check-attr produced {} fields, expected a multiple of 3",
            fields.len()
        )));
    }

    for record in fields.chunks(3) {
        if record[1] != attribute.as_bytes() {
            continue;
        }
        let value = String::from_utf8_lossy(record[2]);
        if NO_VALUE.contains(&&*value) {
            return Ok(None);
        }
        return Ok(Some(value.into_owned()));
    }

    Ok(None)
}
