// Folder allow-lists for uploads and deletions

use std::fmt;
use std::str::FromStr;

/// Only assets under this prefix may be deleted. This is a namespace check,
/// not an ownership check.
pub const DELETABLE_PREFIX: &str = "gallery/";

/// Destination folders a client may upload into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    TeamMembers,
    Gallery,
}

impl UploadFolder {
    pub const ALL: [UploadFolder; 2] = [UploadFolder::TeamMembers, UploadFolder::Gallery];

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFolder::TeamMembers => "teamMembers",
            UploadFolder::Gallery => "gallery",
        }
    }

    /// Team member portraits replace the previous image under the same id and
    /// purge cached copies, so the grant signs `overwrite` and `invalidate`.
    pub fn replaces_existing(&self) -> bool {
        matches!(self, UploadFolder::TeamMembers)
    }
}

impl FromStr for UploadFolder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UploadFolder::ALL
            .into_iter()
            .find(|folder| folder.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for UploadFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_deletable(public_id: &str) -> bool {
    public_id.starts_with(DELETABLE_PREFIX)
}
