// file: src/exporter/palette.rs
// description: deterministic cluster label to color mapping for map output
// reference: tab10 qualitative colormap, resampled evenly to K entries

use crate::models::ClusterCount;

pub const TAB10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Color for `label` among `clusters` labels. Distinct labels always get
/// distinct colors; labels past the last one reuse the last color.
pub fn color_for(label: usize, clusters: ClusterCount) -> &'static str {
    let k = clusters.get();
    let label = label.min(k - 1);
    let idx = (label * TAB10.len() / (k - 1)).min(TAB10.len() - 1);
    TAB10[idx]
}

/// One color per label, in label order.
pub fn palette(clusters: ClusterCount) -> Vec<&'static str> {
    (0..clusters.get()).map(|l| color_for(l, clusters)).collect()
}
