use tracing::{info, warn};

use super::icon_bundle::IconBundle;
use crate::models::{Color, ManifestEntry, ReferenceIcon};
use crate::utils::svg_data_uri;

/// Reference entry whose name AND symbol equal the entry's, ignoring case
pub fn find_reference<'a>(entry: &ManifestEntry, references: &'a [ReferenceIcon]) -> Option<&'a ReferenceIcon> {
    references.iter().find(|r| {
        r.name.to_lowercase() == entry.name.to_lowercase()
            && r.symbol.to_lowercase() == entry.symbol.to_lowercase()
    })
}

/// Prefer the bundle's color and inline SVG for every entry it knows.
///
/// Unmatched entries keep their derived color and an empty icon. A matched
/// entry whose SVG cannot be read keeps an empty icon. Returns the number
/// of entries that received an icon.
pub async fn apply_reference_icons(entries: &mut [ManifestEntry], bundle: &IconBundle) -> usize {
    let mut with_icon = 0;

    for entry in entries.iter_mut() {
        let Some(reference) = find_reference(entry, bundle.icons()) else {
            continue;
        };

        info!("Adding bundled icon for {} to the manifest", entry.name);

        match reference.color.parse::<Color>() {
            Ok(color) => entry.color = color,
            Err(e) => warn!("Keeping derived color for {}: {}", entry.name, e),
        }

        let svg_path = bundle.svg_path(&entry.symbol);
        match tokio::fs::read(&svg_path).await {
            Ok(svg) => {
                entry.icon = svg_data_uri(&svg);
                with_icon += 1;
            }
            Err(e) => warn!("No icon for {} at {}: {}", entry.name, svg_path.display(), e),
        }
    }

    with_icon
}
