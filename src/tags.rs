use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, FileType, TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt};
use tracing::{debug, info};

use crate::{Error, ProcessMode, Result, StrippedTrack};

/// Custom-field keys Mora embeds in purchased files, removed from every
/// processed track.
pub const STRIP_KEYS: [&str; 10] = [
    "45b1d925-1448-5784-b4da-b89901050a13",
    "be242671-3d48-5ac8-b762-7d2db4f584b8",
    "ff8ca75f-2d68-52eb-85d6-1580486025a4",
    "93a74bea-ce97-5571-a56a-c5084dba9873",
    "8e90f26b-372a-5c8c-bb05-1ec0f36ee60c",
    "07f42305-3c75-529c-ba48-09435e88980d",
    "50dbf5a2-f864-5c17-be00-c36dfd3df7b4",
    "MOOD",
    "GENRENUMBER",
    "PERFORMER",
];

/// Strip Mora metadata from one audio file, in place.
///
/// Clears the comment, removes the builtin deletion list plus `extra_keys`
/// from the custom fields, and saves the tag back to disk. Returns the
/// title and artist read after the mutation, for the renamer.
///
/// # Errors
/// Returns an error if the file is not a parsable audio format, carries no
/// tag at all, or the save fails.
pub fn strip_file(path: &Path, mode: ProcessMode, extra_keys: &[String]) -> Result<StrippedTrack> {
    let mut tagged_file = Probe::open(path)?.read()?;
    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());

    if mode == ProcessMode::Interactive {
        dump_track(&stem, &tagged_file);
    }

    let tag = if tagged_file.primary_tag().is_some() {
        tagged_file.primary_tag_mut()
    } else {
        tagged_file.first_tag_mut()
    }
    .ok_or_else(|| Error::NoTag(path.to_path_buf()))?;

    info!("{stem}-正在删除Tag");

    scrub_tag(tag, extra_keys);

    if mode == ProcessMode::Interactive {
        debug!("{stem}-删除后所保留的自定义的Tag:");
        for (key, value) in custom_fields(tag) {
            debug!("{stem}-Custom field {key} : value = {value}");
        }
    }

    let track = StrippedTrack {
        title: tag.title().map(|s| s.to_string()).unwrap_or_default(),
        artist: tag.artist().map(|s| s.to_string()).unwrap_or_default(),
    };

    info!("{stem}-正在保存修改");

    if mode.is_batch() {
        tag.save_to_path(path, WriteOptions::default())?;
    } else {
        save_with_progress(tag, path)?;
    }

    Ok(track)
}

/// Clear the comment and remove every deletion-list key from the tag.
///
/// Key absence is not an error. Named keys that lofty maps onto well-known
/// item keys (MOOD, PERFORMER) are removed under both representations.
pub fn scrub_tag(tag: &mut Tag, extra_keys: &[String]) {
    tag.set_comment(String::new());

    for key in STRIP_KEYS
        .iter()
        .copied()
        .chain(extra_keys.iter().map(String::as_str))
    {
        for item_key in item_keys_for(key) {
            tag.remove_key(&item_key);
        }
    }
}

fn item_keys_for(key: &str) -> Vec<ItemKey> {
    let mut keys = vec![ItemKey::Unknown(key.to_string())];
    match key {
        "MOOD" => keys.push(ItemKey::Mood),
        "PERFORMER" => keys.push(ItemKey::Performer),
        _ => {}
    }
    keys
}

/// Vendor/custom fields of a tag: unknown string keys, plus the named
/// fields Mora writes that lofty maps onto well-known keys.
fn custom_fields(tag: &Tag) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = tag
        .items()
        .filter_map(|item| match (item.key(), item.value()) {
            (ItemKey::Unknown(key), ItemValue::Text(value)) => {
                Some((key.clone(), value.clone()))
            }
            _ => None,
        })
        .collect();

    for (name, item_key) in [("MOOD", ItemKey::Mood), ("PERFORMER", ItemKey::Performer)] {
        if let Some(value) = tag.get_string(&item_key) {
            fields.push((name.to_string(), value.to_string()));
        }
    }

    fields
}

fn dump_track(stem: &str, file: &TaggedFile) {
    let properties = file.properties();
    let tag = file.primary_tag().or_else(|| file.first_tag());

    if let Some(tag) = tag {
        debug!("{stem}-Title : {}", tag.title().unwrap_or_default());
        debug!("{stem}-Artist : {}", tag.artist().unwrap_or_default());
        debug!("{stem}-Album : {}", tag.album().unwrap_or_default());
        debug!("{stem}-Recording year : {}", tag.year().unwrap_or_default());
        debug!("{stem}-Track number : {}", tag.track().unwrap_or_default());
        debug!("{stem}-Disc number : {}", tag.disk().unwrap_or_default());
        debug!("{stem}-Comment : {}", tag.comment().unwrap_or_default());
    }

    debug!("{stem}-Duration (s) : {}", properties.duration().as_secs());
    debug!(
        "{stem}-Bitrate (KBps) : {}",
        properties.audio_bitrate().unwrap_or_default()
    );
    debug!(
        "{stem}-Number of channels : {}",
        properties.channels().unwrap_or_default()
    );
    debug!("{stem}-File type : {:?}", file.file_type());
    debug!(
        "{stem}-Has lossless audio : {}",
        if is_lossless(file.file_type()) { "yes" } else { "no" }
    );

    if let Some(tag) = tag {
        for (key, value) in custom_fields(tag) {
            debug!("{stem}-Custom field {key} : value = {value}");
        }
    }
}

const fn is_lossless(file_type: FileType) -> bool {
    matches!(
        file_type,
        FileType::Flac | FileType::Wav | FileType::Aiff | FileType::Ape | FileType::WavPack
    )
}

// lofty reports no incremental save progress, so the bar brackets the
// save: it renders at zero, then completes when the codec returns.
fn save_with_progress(tag: &Tag, path: &Path) -> Result<()> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("保存进度: {bar:40.green} {percent}%")
            .unwrap(),
    );
    bar.set_position(0);

    tag.save_to_path(path, WriteOptions::default())?;

    bar.set_position(100);
    bar.finish();
    Ok(())
}
