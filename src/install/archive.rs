use anyhow::{Context, Result, anyhow};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    /// The download is the binary itself.
    Raw,
}

impl ArchiveKind {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Self::TarGz
        } else if lower.ends_with(".zip") {
            Self::Zip
        } else {
            Self::Raw
        }
    }
}

/// Unpack `archive` into `dest`.
pub fn extract(archive: &Path, kind: ArchiveKind, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;
    let file =
        File::open(archive).with_context(|| format!("opening archive {}", archive.display()))?;

    match kind {
        ArchiveKind::TarGz => {
            let mut tar = tar::Archive::new(GzDecoder::new(file));
            tar.unpack(dest)
                .with_context(|| format!("unpacking {}", archive.display()))?;
        }
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(file)
                .with_context(|| format!("reading zip {}", archive.display()))?;
            zip.extract(dest)
                .with_context(|| format!("unpacking {}", archive.display()))?;
        }
        ArchiveKind::Raw => {
            return Err(anyhow!("{} is not an archive", archive.display()));
        }
    }
    Ok(())
}

/// First regular file under `root` named like one of `names`, trying the
/// names in order. `.git` is never entered. With `executable_only`, files
/// without an execute bit are ignored.
pub fn find_file(root: &Path, names: &[&str], executable_only: bool) -> Option<PathBuf> {
    names.iter().find_map(|name| {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_file()
                    && e.file_name().to_str() == Some(*name)
                    && (!executable_only || is_executable(e.path()))
            })
            .map(|e| e.into_path())
    })
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Copy `src` to `dest` with mode 0755, replacing whatever was there.
pub fn install_executable(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    // Unlink first; overwriting a running binary in place fails with ETXTBSY
    if dest.exists() || dest.is_symlink() {
        fs::remove_file(dest).with_context(|| format!("removing {}", dest.display()))?;
    }
    fs::copy(src, dest)
        .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
    fs::set_permissions(dest, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("marking {} executable", dest.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn tar_gz_with(path: &Path, entry: &str, body: &[u8]) {
        let gz = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(gz);
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, entry, body).unwrap();
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn zip_with(path: &Path, entry: &str, body: &[u8]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        zip.start_file(entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ArchiveKind::from_name("ffuf_2.1.0_linux_amd64.tar.gz"), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::from_name("tool.TGZ"), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::from_name("nuclei_3.2.0_linux_amd64.zip"), ArchiveKind::Zip);
        assert_eq!(ArchiveKind::from_name("kerbrute_linux_amd64"), ArchiveKind::Raw);
    }

    #[test]
    fn test_extract_tar_gz_and_find_nested_binary() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("ffuf.tar.gz");
        tar_gz_with(&archive, "ffuf_2.1.0/ffuf", b"binary");

        let dest = dir.path().join("out");
        extract(&archive, ArchiveKind::TarGz, &dest).unwrap();
        let found = find_file(&dest, &["ffuf"], false).unwrap();
        assert_eq!(fs::read(found).unwrap(), b"binary");
    }

    #[test]
    fn test_extract_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("nuclei.zip");
        zip_with(&archive, "nuclei", b"zipped");

        let dest = dir.path().join("out");
        extract(&archive, ArchiveKind::Zip, &dest).unwrap();
        assert_eq!(fs::read(dest.join("nuclei")).unwrap(), b"zipped");
    }

    #[test]
    fn test_find_prefers_earlier_name_and_skips_git() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("pattern"), "").unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin").join("binary"), "").unwrap();
        fs::write(dir.path().join("pattern"), "").unwrap();

        assert_eq!(
            find_file(dir.path(), &["pattern", "binary"], false),
            Some(dir.path().join("pattern"))
        );
        fs::remove_file(dir.path().join("pattern")).unwrap();
        assert_eq!(
            find_file(dir.path(), &["pattern", "binary"], false),
            Some(dir.path().join("bin").join("binary"))
        );
    }

    #[test]
    fn test_executable_only_ignores_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydra");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_file(dir.path(), &["hydra"], true).is_none());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_file(dir.path(), &["hydra"], true), Some(path));
    }

    #[test]
    fn test_install_executable_sets_mode() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src-bin");
        fs::write(&src, "new").unwrap();
        let dest = dir.path().join("bin").join("tool");
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, "old").unwrap();

        install_executable(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
