//! store/persist.rs
//! Load and full-rewrite of the JSON state image.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::store::tree::StateTree;
use crate::types::Result;
use crate::utils::{corrupt_path, write_atomic};

/// Read the image at `path`.
///
/// Never fails: a missing or unreadable image starts empty. A corrupt one
/// is renamed to `<path>.corrupt` before anything overwrites it.
pub fn load_tree(path: &Path) -> StateTree {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no state image yet, starting empty");
            return StateTree::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state image unreadable, starting empty");
            return StateTree::default();
        }
    };

    match serde_json::from_slice::<Value>(&bytes).and_then(StateTree::from_image) {
        Ok(tree) => {
            info!(
                path = %path.display(),
                groups = tree.group_count(),
                leaves = tree.leaf_count(),
                "loaded state image"
            );
            tree
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state image corrupt, starting empty");
            set_aside(path);
            StateTree::default()
        }
    }
}

fn set_aside(path: &Path) {
    let aside = corrupt_path(path);
    match fs::rename(path, &aside) {
        Ok(()) => warn!(path = %path.display(), moved_to = %aside.display(), "corrupt state image kept aside"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not move corrupt state image aside"),
    }
}

/// Serialize the whole tree and atomically replace the image at `path`.
pub fn save_tree(path: &Path, tree: &StateTree) -> Result<()> {
    let bytes = serde_json::to_vec(tree)?;
    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "state image written");
    Ok(())
}
