use crate::dbc::reader::DbcFile;

/// The eight body regions a character atlas composites onto. String IO for
/// regions only happens at the JSON/archive boundary; everywhere else this
/// enum is used directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRegion {
    ArmUpper,
    ArmLower,
    Hand,
    TorsoUpper,
    TorsoLower,
    LegUpper,
    LegLower,
    Foot,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 8] = [
        BodyRegion::ArmUpper,
        BodyRegion::ArmLower,
        BodyRegion::Hand,
        BodyRegion::TorsoUpper,
        BodyRegion::TorsoLower,
        BodyRegion::LegUpper,
        BodyRegion::LegLower,
        BodyRegion::Foot,
    ];

    pub fn as_json_key(self) -> &'static str {
        match self {
            BodyRegion::ArmUpper => "armUpper",
            BodyRegion::ArmLower => "armLower",
            BodyRegion::Hand => "hand",
            BodyRegion::TorsoUpper => "torsoUpper",
            BodyRegion::TorsoLower => "torsoLower",
            BodyRegion::LegUpper => "legUpper",
            BodyRegion::LegLower => "legLower",
            BodyRegion::Foot => "foot",
        }
    }

    pub fn from_json_key(key: &str) -> Option<BodyRegion> {
        BodyRegion::ALL.into_iter().find(|r| r.as_json_key() == key)
    }

    /// The filename-suffix tokens (case-insensitive) that select this region
    /// regardless of the JSON key supplied alongside it.
    pub fn suffix(self) -> &'static str {
        match self {
            BodyRegion::ArmUpper => "_AU",
            BodyRegion::ArmLower => "_AL",
            BodyRegion::Hand => "_HA",
            BodyRegion::TorsoUpper => "_TU",
            BodyRegion::TorsoLower => "_TL",
            BodyRegion::LegUpper => "_LU",
            BodyRegion::LegLower => "_LL",
            BodyRegion::Foot => "_FO",
        }
    }

    pub fn from_suffix(token: &str) -> Option<BodyRegion> {
        let upper = token.to_uppercase();
        BodyRegion::ALL.into_iter().find(|r| upper.ends_with(r.suffix()))
    }
}

/// The fields of an ItemDisplayInfo record the atlas compositor and item-display-info
/// projection actually consume. All other fields of the source record are discarded.
#[derive(Debug, Clone, Default)]
pub struct ItemDisplayRecord {
    pub id: u32,
    pub model_l: String,
    pub model_r: String,
    pub tex_l: String,
    pub tex_r: String,
    pub geoset_1: u32,
    pub geoset_2: u32,
    pub flags: u32,
    pub helmet_geoset_1: u32,
    pub helmet_geoset_2: u32,
    /// region -> base texture token, as consumed by the atlas compositor (C8).
    pub tex: std::collections::HashMap<BodyRegion, String>,
    pub item_visual: u32,
    pub particle_color_id: u32,
}

/// Projects every record of an ItemDisplayInfo.dbc-shaped tabular file using its
/// fixed field schema.
pub fn project_item_display_info(dbc: &DbcFile) -> Vec<ItemDisplayRecord> {
    dbc.records
        .iter()
        .filter(|fields| fields.len() > 24)
        .map(|fields| {
            let mut tex = std::collections::HashMap::new();
            for (i, region) in BodyRegion::ALL.into_iter().enumerate() {
                let token = dbc.lookup_string(fields[15 + i]);
                if !token.is_empty() {
                    tex.insert(region, token);
                }
            }

            ItemDisplayRecord {
                id: fields[0],
                model_l: dbc.lookup_string(fields[1]),
                model_r: dbc.lookup_string(fields[2]),
                tex_l: dbc.lookup_string(fields[3]),
                tex_r: dbc.lookup_string(fields[4]),
                geoset_1: fields[7],
                geoset_2: fields[8],
                flags: fields[9],
                helmet_geoset_1: fields[12],
                helmet_geoset_2: fields[13],
                tex,
                item_visual: fields[23],
                particle_color_id: fields[24],
            }
        })
        .collect()
}
