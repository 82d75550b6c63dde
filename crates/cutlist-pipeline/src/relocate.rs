use cutlist_model::{AnchoredImage, RowRemap};

/// Re-anchor source images at their destination rows.
///
/// Images anchored on rows the classifier dropped have no remap entry and
/// are discarded. Survivors are value-cloned at `(same column, remapped
/// row)`; the clones share no state with the source records, so later edits
/// to one sheet never leak into another.
pub fn relocate(images: &[AnchoredImage], remap: &RowRemap) -> Vec<AnchoredImage> {
    images
        .iter()
        .filter_map(|image| match remap.get(&image.row) {
            Some(destination) => Some(image.with_row(*destination)),
            None => {
                log::debug!(
                    "dropping image {:?} anchored at dropped source row {}",
                    image.name,
                    image.row
                );
                None
            }
        })
        .collect()
}
