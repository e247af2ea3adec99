use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use mpq::Archive;

pub fn read_mpq_file_into_owned(archive: &mut Archive, file_name: &str) -> Result<Vec<u8>, std::io::Error> {
    let file = archive.open_file(file_name)?;
    let mut buf: Vec<u8> = vec![0; file.size() as usize];
    file.read(archive, &mut buf)?;
    Ok(buf)
}

fn normalize(path: &str) -> String {
    path.to_lowercase().replace('/', "\\")
}

/// Case-insensitive, priority-ordered virtual filesystem over a set of MPQ archives.
///
/// Archives are opened in the order given by `archive_names`; that order IS the overlay
/// priority (the first archive to claim a path wins, "first writer wins" indexing), so
/// callers must list highest-priority archives first — patches before the base game
/// archives.
pub struct MPQLoader {
    archives: Vec<RefCell<Archive>>,
    /// normalized path -> (archive index, original-cased path as stored in the archive)
    index: HashMap<String, (usize, String)>,
}

impl MPQLoader {
    pub fn new(data_dir: &str, archive_names: &[String]) -> Self {
        let mut archives = Vec::new();
        let mut index = HashMap::new();

        for name in archive_names {
            let full_path = Path::new(data_dir).join(name);
            let mut archive = match Archive::open(full_path.to_string_lossy().as_ref()) {
                Ok(archive) => archive,
                Err(_) => {
                    warn!("Could not open archive {}, skipping", name);
                    continue;
                }
            };

            let listfile = match read_mpq_file_into_owned(&mut archive, "(listfile)") {
                Ok(buf) => buf,
                Err(_) => {
                    warn!("Archive {} has no (listfile), it will not be indexed", name);
                    archives.push(RefCell::new(archive));
                    continue;
                }
            };

            let archive_id = archives.len();
            let text = String::from_utf8_lossy(&listfile);
            let mut file_count = 0usize;
            for line in text.lines() {
                let original_path = line.trim_end_matches('\r').trim();
                if original_path.is_empty() {
                    continue;
                }

                let key = normalize(original_path);
                // "first writer wins": an entry already owned by a higher-priority archive is kept.
                index.entry(key).or_insert_with(|| {
                    file_count += 1;
                    (archive_id, original_path.to_string())
                });
            }

            debug!("Indexed {} ({} files) as archive {}", name, file_count, archive_id);
            archives.push(RefCell::new(archive));
        }

        MPQLoader { archives, index }
    }

    /// `read(path)`: normalizes and looks up the overlay index; on a hit, delegates to
    /// the owning archive with the original-cased path. Never panics on a corrupted
    /// archive; a read failure is logged and reported as absent.
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        let key = normalize(path);
        let (archive_id, original_path) = self.index.get(&key)?;
        let mut archive = self.archives[*archive_id].borrow_mut();
        match read_mpq_file_into_owned(&mut archive, original_path) {
            Ok(buf) => Some(buf),
            Err(e) => {
                warn!("Failed to read {} from archive {}: {}", original_path, archive_id, e);
                None
            }
        }
    }

    /// `list(substring)`: case-insensitive substring match against normalized keys,
    /// returns the original-cased paths.
    pub fn list(&self, substring: &str) -> Vec<String> {
        let needle = normalize(substring);
        self.index
            .values()
            .filter(|(_, path)| normalize(path).contains(&needle))
            .map(|(_, path)| path.clone())
            .collect()
    }
}
