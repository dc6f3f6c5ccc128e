use crate::db::log::audit_quiet;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Snapshot the database at `db_path` into `dest`, optionally zipped.
    ///
    /// An existing destination is only replaced with `force`, or after the
    /// user confirms on stdin. Returns the final file, or `None` when the
    /// user declined.
    pub fn backup(
        conn: &Connection,
        db_path: &Path,
        dest: &Path,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        // 1️⃣ Check DB exists
        if !db_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", db_path.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Existing destination: --force or ask
        if dest.exists() {
            if !force && !confirm_overwrite(dest, std::io::stdin().lock())? {
                println!("❌ Backup cancelled by user.");
                return Ok(None);
            }
            fs::remove_file(dest)?;
        }

        // 4️⃣ Consistent snapshot, WAL contents included
        conn.execute("VACUUM INTO ?1", [dest.to_string_lossy()])?;
        println!("✅ Backup created: {}", dest.display());

        // 5️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                eprintln!("⚠️ Failed to remove uncompressed backup: {}", e);
            } else {
                println!("🗑️ Removed uncompressed backup: {}", dest.display());
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        // 6️⃣ Log in DB
        audit_quiet(
            conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(Some(final_path))
    }
}

fn confirm_overwrite(dest: &Path, mut input: impl BufRead) -> AppResult<bool> {
    println!(
        "⚠️  The file '{}' already exists.\nDo you want to overwrite it? [y/N]: ",
        dest.display()
    );
    print!("> ");
    std::io::stdout().flush().ok();

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Other(format!("invalid backup path: {}", path.display())))?;

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    println!("📦 Compressed: {}", zip_path.display());

    Ok(zip_path)
}
