use std::collections::BTreeMap;

use thiserror::Error;

use crate::assets::AssetClass;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("unknown asset in allocation map: {0}")]
    UnknownAsset(String),
    #[error("allocation for {name} must be between 0 and 100, got {value}")]
    OutOfRange { name: String, value: u32 },
    #[error("the total allocation must be 100%. Currently, it's {total}%")]
    NotFullyAllocated { total: u32 },
}

/// Resolves the configured allocation map against the asset table.
///
/// Returns one entry per known asset, in table order, with unlisted assets
/// at 0%. The run halts here unless the percentages sum to exactly 100; no
/// fetch happens on a rejected allocation.
pub fn collect_allocations(
    configured: &BTreeMap<String, u32>,
    assets: &[AssetClass],
) -> Result<Vec<(String, u32)>, AllocationError> {
    for name in configured.keys() {
        if !assets.iter().any(|a| a.name == name) {
            return Err(AllocationError::UnknownAsset(name.clone()));
        }
    }

    let mut allocations = Vec::with_capacity(assets.len());
    let mut total: u32 = 0;
    for asset in assets {
        let pct = configured.get(asset.name).copied().unwrap_or(0);
        if pct > 100 {
            return Err(AllocationError::OutOfRange {
                name: asset.name.to_string(),
                value: pct,
            });
        }
        total += pct;
        allocations.push((asset.name.to_string(), pct));
    }

    if total != 100 {
        return Err(AllocationError::NotFullyAllocated { total });
    }
    Ok(allocations)
}
