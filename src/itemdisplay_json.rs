use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use formats::dbc::item_display::{BodyRegion, ItemDisplayRecord};

/// The on-disk JSON shape of `item-display-info.json`. Region and display-id
/// strings exist only at this boundary; everywhere else they're typed enum/u32.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ItemDisplayEntry {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tex: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "modelL")]
    pub model_l: String,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "modelR")]
    pub model_r: String,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "texL")]
    pub tex_l: String,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "texR")]
    pub tex_r: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo2: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "helmGeo1")]
    pub helm_geo1: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "helmGeo2")]
    pub helm_geo2: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

pub type ItemDisplayMap = HashMap<String, ItemDisplayEntry>;

/// A zero value for these fields means "absent" in the source tabular records, the
/// same convention the upstream exporter uses (`if geo1: entry['geo1'] = geo1`).
fn non_zero(value: u32) -> Option<u32> {
    if value == 0 { None } else { Some(value) }
}

/// Projects parsed records into the on-disk map, skipping display id 0 and emitting
/// only non-empty fields per entry.
pub fn to_json_map(records: &[ItemDisplayRecord]) -> ItemDisplayMap {
    records
        .iter()
        .filter(|record| record.id != 0)
        .filter_map(|record| {
            let tex = record
                .tex
                .iter()
                .map(|(region, token)| (region.as_json_key().to_string(), token.clone()))
                .collect();

            let entry = ItemDisplayEntry {
                tex,
                model_l: record.model_l.clone(),
                model_r: record.model_r.clone(),
                tex_l: record.tex_l.clone(),
                tex_r: record.tex_r.clone(),
                geo1: non_zero(record.geoset_1),
                geo2: non_zero(record.geoset_2),
                helm_geo1: non_zero(record.helmet_geoset_1),
                helm_geo2: non_zero(record.helmet_geoset_2),
                flags: non_zero(record.flags),
            };

            if entry.tex.is_empty()
                && entry.model_l.is_empty()
                && entry.model_r.is_empty()
                && entry.tex_l.is_empty()
                && entry.tex_r.is_empty()
                && entry.geo1.is_none()
                && entry.geo2.is_none()
                && entry.helm_geo1.is_none()
                && entry.helm_geo2.is_none()
                && entry.flags.is_none()
            {
                return None;
            }

            Some((record.id.to_string(), entry))
        })
        .collect()
}

/// Parses a loaded `item-display-info.json` map back into the `BodyRegion`-keyed
/// form the atlas compositor consumes, discarding entries whose display id or
/// region key isn't recognized.
pub fn from_json_map(map: &ItemDisplayMap) -> HashMap<u32, ItemDisplayRecord> {
    map.iter()
        .filter_map(|(id, entry)| {
            let id: u32 = id.parse().ok()?;
            let tex = entry
                .tex
                .iter()
                .filter_map(|(key, token)| Some((BodyRegion::from_json_key(key)?, token.clone())))
                .collect();

            Some((
                id,
                ItemDisplayRecord {
                    id,
                    model_l: entry.model_l.clone(),
                    model_r: entry.model_r.clone(),
                    tex_l: entry.tex_l.clone(),
                    tex_r: entry.tex_r.clone(),
                    geoset_1: entry.geo1.unwrap_or(0),
                    geoset_2: entry.geo2.unwrap_or(0),
                    flags: entry.flags.unwrap_or(0),
                    helmet_geoset_1: entry.helm_geo1.unwrap_or(0),
                    helmet_geoset_2: entry.helm_geo2.unwrap_or(0),
                    tex,
                    item_visual: 0,
                    particle_color_id: 0,
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ItemDisplayRecord {
        let mut tex = HashMap::new();
        tex.insert(BodyRegion::TorsoUpper, "Chain_Chest_01".to_string());
        ItemDisplayRecord {
            id: 42,
            model_l: "Cape01.mdx".into(),
            model_r: String::new(),
            tex_l: String::new(),
            tex_r: String::new(),
            geoset_1: 1,
            geoset_2: 0,
            flags: 0,
            helmet_geoset_1: 0,
            helmet_geoset_2: 0,
            tex,
            item_visual: 7,
            particle_color_id: 0,
        }
    }

    #[test]
    fn round_trips_through_json_keys() {
        let records = vec![sample_record()];
        let map = to_json_map(&records);
        let entry = map.get("42").expect("entry for id 42");
        assert_eq!(entry.tex.get("torsoUpper"), Some(&"Chain_Chest_01".to_string()));

        let parsed = from_json_map(&map);
        let record = parsed.get(&42).expect("parsed record");
        assert_eq!(record.tex.get(&BodyRegion::TorsoUpper), Some(&"Chain_Chest_01".to_string()));
        assert_eq!(record.model_l, "Cape01.mdx");
    }

    #[test]
    fn zero_valued_fields_are_omitted() {
        let records = vec![sample_record()];
        let map = to_json_map(&records);
        let entry = map.get("42").expect("entry for id 42");
        assert_eq!(entry.geo1, Some(1));
        assert_eq!(entry.geo2, None);
        assert_eq!(entry.flags, None);
    }

    #[test]
    fn display_id_zero_and_fully_empty_records_are_dropped() {
        let empty = ItemDisplayRecord { id: 7, ..Default::default() };
        let zero_id = ItemDisplayRecord { id: 0, geoset_1: 1, ..Default::default() };
        let map = to_json_map(&[empty, zero_id]);
        assert!(map.is_empty());
    }

    #[test]
    fn unrecognized_region_keys_are_dropped() {
        let mut map = ItemDisplayMap::new();
        let mut entry = ItemDisplayEntry::default();
        entry.tex.insert("notARegion".to_string(), "Foo".to_string());
        map.insert("1".to_string(), entry);

        let parsed = from_json_map(&map);
        assert!(parsed.get(&1).unwrap().tex.is_empty());
    }
}
