use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Replaces `path` with `contents` by writing a sibling `.tmp` file first and renaming it into
/// place, so a crash mid-write never leaves a truncated config behind.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  let mut tmp_file = fs::File::create(&tmp_path)?;
  tmp_file.write_all(contents.as_bytes())?;
  tmp_file.sync_all()?;
  drop(tmp_file);

  fs::rename(&tmp_path, path)
}
