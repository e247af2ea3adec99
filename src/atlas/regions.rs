use formats::dbc::item_display::BodyRegion;

pub const ATLAS_SIZE: u32 = 512;

#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// The fixed rectangle each body region tiles onto the 512x512 atlas canvas.
pub fn rect(region: BodyRegion) -> Rect {
    match region {
        BodyRegion::ArmUpper => Rect { x: 0, y: 0, w: 256, h: 128 },
        BodyRegion::ArmLower => Rect { x: 0, y: 128, w: 256, h: 128 },
        BodyRegion::Hand => Rect { x: 0, y: 256, w: 256, h: 64 },
        BodyRegion::TorsoUpper => Rect { x: 0, y: 320, w: 256, h: 128 },
        BodyRegion::TorsoLower => Rect { x: 0, y: 448, w: 256, h: 64 },
        BodyRegion::LegUpper => Rect { x: 256, y: 0, w: 256, h: 128 },
        BodyRegion::LegLower => Rect { x: 256, y: 128, w: 256, h: 128 },
        BodyRegion::Foot => Rect { x: 256, y: 256, w: 256, h: 64 },
    }
}

/// Archive component directory under `Item\TextureComponents\` that holds a
/// region's overlay textures.
pub fn component_dir(region: BodyRegion) -> &'static str {
    match region {
        BodyRegion::ArmUpper => "ArmUpper",
        BodyRegion::ArmLower => "ArmLower",
        BodyRegion::Hand => "Hand",
        BodyRegion::TorsoUpper => "TorsoUpper",
        BodyRegion::TorsoLower => "TorsoLower",
        BodyRegion::LegUpper => "LegUpper",
        BodyRegion::LegLower => "LegLower",
        BodyRegion::Foot => "Foot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_pairwise_disjoint_and_cover_the_canvas() {
        let mut covered = vec![false; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        for region in BodyRegion::ALL {
            let r = rect(region);
            for y in r.y..r.y + r.h {
                for x in r.x..r.x + r.w {
                    let idx = (y * ATLAS_SIZE + x) as usize;
                    assert!(!covered[idx], "region {:?} overlaps another", region);
                    covered[idx] = true;
                }
            }
        }
    }
}
