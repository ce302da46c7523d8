//! Prebuilt binaries from the latest GitHub release.
//!
//! Asset names are not standardized, so for a base pattern such as `ffuf` a
//! fixed, ordered list of plausible file names is generated and the first one
//! the release actually carries wins. There is no retry against older
//! releases.

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::archive::{self, ArchiveKind};
use super::context::RunContext;
use super::executor::AttemptError;
use crate::common::progress::create_spinner;
use crate::host::ArchSpellings;
use crate::registry::ToolSpec;
use crate::ui::prelude::*;

pub const OS_TOKENS: [&str; 2] = ["linux", "Linux"];
pub const EXTENSIONS: [&str; 3] = [".tar.gz", ".zip", ""];

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
}

/// How projects join name, version, os and arch in asset names.
#[derive(Debug, Clone, Copy)]
enum Layout {
    UnderscoreVersioned,
    DashVersioned,
    Underscore,
    Dash,
}

impl Layout {
    const ALL: [Layout; 4] = [
        Self::UnderscoreVersioned,
        Self::DashVersioned,
        Self::Underscore,
        Self::Dash,
    ];

    fn render(self, base: &str, version: &str, os: &str, arch: &str) -> String {
        match self {
            Self::UnderscoreVersioned => format!("{base}_{version}_{os}_{arch}"),
            Self::DashVersioned => format!("{base}-{version}-{os}-{arch}"),
            Self::Underscore => format!("{base}_{os}_{arch}"),
            Self::Dash => format!("{base}-{os}-{arch}"),
        }
    }
}

/// Every asset name worth trying, in preference order, without duplicates.
///
/// The order is layout, then version spelling (`tag`, then `tag` without a
/// leading `v`), then os token, then arch spelling, then extension. The
/// output depends only on the inputs.
pub fn candidates(base: &str, tag: &str, arch: &ArchSpellings) -> Vec<String> {
    let versions = [tag, tag.strip_prefix('v').unwrap_or(tag)];
    let arches = arch.distinct();

    let mut out: Vec<String> = Vec::new();
    for layout in Layout::ALL {
        for version in versions {
            for os in OS_TOKENS {
                for arch in &arches {
                    let stem = layout.render(base, version, os, arch);
                    for ext in EXTENSIONS {
                        let name = format!("{stem}{ext}");
                        if !out.contains(&name) {
                            out.push(name);
                        }
                    }
                }
            }
        }
    }
    out
}

/// First candidate the release lists, walking candidates in order.
pub fn match_asset<'a>(candidates: &[String], assets: &'a [Asset]) -> Option<&'a Asset> {
    candidates
        .iter()
        .find_map(|wanted| assets.iter().find(|asset| &asset.name == wanted))
}

fn download_url(base: &str, repo: &str, tag: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    format!("{base}/{repo}/releases/download/{tag}/{name}")
}

pub(super) fn install(
    ctx: &mut RunContext,
    tool: &ToolSpec,
    repo: &str,
    pattern: &str,
) -> Result<(), AttemptError> {
    let release = fetch_latest(ctx, repo)?;
    let names = candidates(pattern, &release.tag_name, &ctx.caps.arch);

    emit(
        Level::Debug,
        "install.github.release",
        &format!(
            "{} {} {}: {} assets, {} candidates",
            char::from(NerdFont::Git),
            repo,
            release.tag_name,
            release.assets.len(),
            names.len()
        ),
        None,
    );

    let work = ctx.scratch.subdir(tool.name)?;
    let (name, download) = if release.assets.is_empty() {
        try_candidate_urls(ctx, repo, &release.tag_name, &names, &work)?
    } else {
        let asset = match_asset(&names, &release.assets).ok_or_else(|| {
            AttemptError::NoMatchingAsset {
                repo: repo.to_string(),
            }
        })?;
        let dest = work.join(&asset.name);
        download_to(ctx, &asset.browser_download_url, &dest)?;
        (asset.name.clone(), dest)
    };

    let binary = match ArchiveKind::from_name(&name) {
        ArchiveKind::Raw => download,
        kind => {
            let unpacked = work.join("unpacked");
            archive::extract(&download, kind, &unpacked)?;
            archive::find_file(&unpacked, &[pattern, tool.binary], false).ok_or_else(|| {
                AttemptError::BinaryNotFound {
                    binary: tool.binary.to_string(),
                }
            })?
        }
    };

    archive::install_executable(&binary, &ctx.paths.bin_dir.join(tool.binary))?;
    Ok(())
}

/// Releases that hide their asset list: try each candidate URL in order.
fn try_candidate_urls(
    ctx: &RunContext,
    repo: &str,
    tag: &str,
    names: &[String],
    work: &Path,
) -> Result<(String, std::path::PathBuf), AttemptError> {
    for name in names {
        let dest = work.join(name);
        let url = download_url(&ctx.config.github_download_url, repo, tag, name);
        match download_to(ctx, &url, &dest) {
            Ok(()) => return Ok((name.clone(), dest)),
            Err(AttemptError::Http { .. }) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(AttemptError::NoMatchingAsset {
        repo: repo.to_string(),
    })
}

fn fetch_latest(ctx: &RunContext, repo: &str) -> Result<Release, AttemptError> {
    let api = ctx.config.github_api_url.trim_end_matches('/');
    let url = format!("{api}/repos/{repo}/releases/latest");

    let mut request = ctx
        .http
        .get(&url)
        .header(ACCEPT, "application/vnd.github+json");
    if let Some(token) = &ctx.config.github_token {
        request = request.bearer_auth(token);
    }

    let response = request.send().map_err(|e| AttemptError::Network {
        url: url.clone(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v.as_bytes() == b"0"))
    {
        return Err(AttemptError::RateLimited);
    }
    if !status.is_success() {
        return Err(AttemptError::Http {
            url,
            status: status.as_u16(),
        });
    }

    response.json::<Release>().map_err(|e| AttemptError::Network {
        url,
        message: format!("invalid release JSON: {e}"),
    })
}

fn download_to(ctx: &RunContext, url: &str, dest: &Path) -> Result<(), AttemptError> {
    let pb = create_spinner(format!("Downloading {}...", url));
    let result = fetch_to_file(ctx, url, dest);
    pb.finish_and_clear();
    result
}

fn fetch_to_file(ctx: &RunContext, url: &str, dest: &Path) -> Result<(), AttemptError> {
    let network = |e: reqwest::Error| AttemptError::Network {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = ctx
        .http
        .get(url)
        .timeout(ctx.config.download_timeout())
        .send()
        .map_err(network)?;

    if !response.status().is_success() {
        return Err(AttemptError::Http {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().map_err(network)?;
    fs::write(dest, &bytes).map_err(|e| anyhow::anyhow!("writing {}: {e}", dest.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            browser_download_url: format!("https://example.invalid/{name}"),
        }
    }

    #[test]
    fn test_candidates_are_deterministic() {
        let arch = ArchSpellings::from_machine("x86_64");
        let first = candidates("ffuf", "v2.1.0", &arch);
        let second = candidates("ffuf", "v2.1.0", &arch);
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_order() {
        let arch = ArchSpellings::from_machine("x86_64");
        let names = candidates("ffuf", "v2.1.0", &arch);

        assert_eq!(names[0], "ffuf_v2.1.0_linux_amd64.tar.gz");
        assert_eq!(names[1], "ffuf_v2.1.0_linux_amd64.zip");
        assert_eq!(names[2], "ffuf_v2.1.0_linux_amd64");
        assert_eq!(names[3], "ffuf_v2.1.0_linux_x86_64.tar.gz");

        let pos = |n: &str| names.iter().position(|c| c == n).unwrap();
        assert!(pos("ffuf_v2.1.0_Linux_amd64.tar.gz") < pos("ffuf_2.1.0_linux_amd64.tar.gz"));
        assert!(pos("ffuf_2.1.0_linux_amd64.tar.gz") < pos("ffuf-2.1.0-linux-amd64.tar.gz"));
        assert!(pos("ffuf-v2.1.0-Linux-x86_64") < pos("ffuf_linux_amd64.tar.gz"));
        assert_eq!(names.last().unwrap(), "ffuf-Linux-x86_64");
    }

    #[test]
    fn test_candidates_have_no_duplicates() {
        // Tag without `v` and uniform arch spellings collapse many combinations
        let arch = ArchSpellings::from_machine("riscv64");
        let names = candidates("tool", "1.0", &arch);
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        // 2 versioned layouts + 2 plain layouts, 2 os tokens, 3 extensions
        assert_eq!(names.len(), 4 * 2 * 3);
    }

    #[test]
    fn test_match_walks_candidates_in_order() {
        let arch = ArchSpellings::from_machine("x86_64");
        let names = candidates("gobuster", "v3.6.0", &arch);
        let assets = vec![
            asset("gobuster_Darwin_x86_64.tar.gz"),
            asset("gobuster_Linux_x86_64.tar.gz"),
            asset("gobuster_Linux_arm64.tar.gz"),
            asset("checksums.txt"),
        ];
        assert_eq!(
            match_asset(&names, &assets).unwrap().name,
            "gobuster_Linux_x86_64.tar.gz"
        );
    }

    #[test]
    fn test_match_prefers_earlier_candidate_over_asset_order() {
        let arch = ArchSpellings::from_machine("x86_64");
        let names = candidates("nuclei", "v3.2.0", &arch);
        let assets = vec![
            asset("nuclei_3.2.0_linux_amd64.zip"),
            asset("nuclei_3.2.0_linux_amd64.tar.gz"),
        ];
        assert_eq!(
            match_asset(&names, &assets).unwrap().name,
            "nuclei_3.2.0_linux_amd64.tar.gz"
        );
    }

    #[test]
    fn test_no_match() {
        let arch = ArchSpellings::from_machine("aarch64");
        let names = candidates("kerbrute", "v1.0.3", &arch);
        let assets = vec![asset("kerbrute_linux_amd64"), asset("kerbrute_windows_386.exe")];
        assert!(match_asset(&names, &assets).is_none());
    }

    #[test]
    fn test_release_json_without_assets() {
        let release: Release = serde_json::from_str(r#"{"tag_name": "v1.0.0"}"#).unwrap();
        assert!(release.assets.is_empty());
        assert_eq!(
            download_url(
                "https://github.com/",
                "ropnop/kerbrute",
                &release.tag_name,
                "kerbrute_linux_amd64"
            ),
            "https://github.com/ropnop/kerbrute/releases/download/v1.0.0/kerbrute_linux_amd64"
        );
    }

    mod served {
        use super::super::*;
        use crate::common::config::ArmoryConfig;
        use crate::common::distro::DistroFamily;
        use crate::common::paths::InstallPaths;
        use crate::host::tests::caps;
        use crate::registry::{Category, ToolSpec};
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use serde_json::json;
        use std::ffi::OsString;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const TOOL: ToolSpec = ToolSpec {
            name: "kerbrute",
            category: Category::Recon,
            binary: "kerbrute",
            description: "demo",
            version_arg: None,
            methods: &[],
        };

        /// A run context whose GitHub endpoints all point at `base`.
        fn context(base: &str) -> (RunContext, TempDir) {
            let root = tempfile::tempdir().unwrap();
            let paths =
                InstallPaths::with_root(root.path().join("data"), root.path(), &OsString::new())
                    .unwrap();
            let config = ArmoryConfig {
                scratch_root: Some(root.path().join("scratch")),
                github_api_url: base.to_string(),
                github_download_url: base.to_string(),
                ..Default::default()
            };
            let ctx = RunContext::with_parts(caps(DistroFamily::Debian, &[]), paths, config)
                .unwrap();
            (ctx, root)
        }

        async fn mock_latest(server: &MockServer, repo: &str, release: serde_json::Value) {
            Mock::given(method("GET"))
                .and(path(format!("/repos/{repo}/releases/latest")))
                .and(header("accept", "application/vnd.github+json"))
                .respond_with(ResponseTemplate::new(200).set_body_json(release))
                .mount(server)
                .await;
        }

        fn tar_gz(entry: &str, body: &[u8]) -> Vec<u8> {
            let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, entry, body).unwrap();
            builder.into_inner().unwrap().finish().unwrap()
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_hidden_assets_tries_candidate_urls_in_order() {
            let server = MockServer::start().await;
            mock_latest(&server, "ropnop/kerbrute", json!({ "tag_name": "v1.0.3" })).await;

            let prefix = "/ropnop/kerbrute/releases/download/v1.0.3";
            for missing in ["kerbrute_v1.0.3_linux_amd64.tar.gz", "kerbrute_v1.0.3_linux_amd64.zip"] {
                Mock::given(method("GET"))
                    .and(path(format!("{prefix}/{missing}")))
                    .respond_with(ResponseTemplate::new(404))
                    .expect(1)
                    .mount(&server)
                    .await;
            }
            Mock::given(method("GET"))
                .and(path(format!("{prefix}/kerbrute_v1.0.3_linux_amd64")))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(b"#!/bin/sh\necho kerbrute\n"))
                .expect(1)
                .mount(&server)
                .await;

            let base = server.uri();
            let installed = tokio::task::spawn_blocking(move || {
                let (mut ctx, _root) = context(&base);
                install(&mut ctx, &TOOL, "ropnop/kerbrute", "kerbrute").unwrap();
                fs::read_to_string(ctx.paths.bin_dir.join("kerbrute")).unwrap()
            })
            .await
            .unwrap();
            assert_eq!(installed, "#!/bin/sh\necho kerbrute\n");

            let requested: Vec<String> = server
                .received_requests()
                .await
                .unwrap()
                .iter()
                .map(|r| r.url.path().to_string())
                .collect();
            assert_eq!(
                requested,
                [
                    "/repos/ropnop/kerbrute/releases/latest".to_string(),
                    format!("{prefix}/kerbrute_v1.0.3_linux_amd64.tar.gz"),
                    format!("{prefix}/kerbrute_v1.0.3_linux_amd64.zip"),
                    format!("{prefix}/kerbrute_v1.0.3_linux_amd64"),
                ]
            );
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_rate_limit_responses() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/repos/a/throttled/releases/latest"))
                .respond_with(ResponseTemplate::new(429))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/repos/a/exhausted/releases/latest"))
                .respond_with(
                    ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/repos/a/forbidden/releases/latest"))
                .respond_with(
                    ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "12"),
                )
                .mount(&server)
                .await;

            let base = server.uri();
            tokio::task::spawn_blocking(move || {
                let (ctx, _root) = context(&base);
                assert!(matches!(
                    fetch_latest(&ctx, "a/throttled"),
                    Err(AttemptError::RateLimited)
                ));
                assert!(matches!(
                    fetch_latest(&ctx, "a/exhausted"),
                    Err(AttemptError::RateLimited)
                ));
                assert!(matches!(
                    fetch_latest(&ctx, "a/forbidden"),
                    Err(AttemptError::Http { status: 403, .. })
                ));
            })
            .await
            .unwrap();
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn test_archived_asset_lands_in_bin_dir_executable() {
            let server = MockServer::start().await;
            mock_latest(
                &server,
                "ropnop/kerbrute",
                json!({
                    "tag_name": "v1.0.3",
                    "assets": [
                        {
                            "name": "kerbrute_1.0.3_Linux_arm64.tar.gz",
                            "browser_download_url": format!("{}/dl/arm64.tar.gz", server.uri())
                        },
                        {
                            "name": "kerbrute_1.0.3_Linux_x86_64.tar.gz",
                            "browser_download_url": format!("{}/dl/x86_64.tar.gz", server.uri())
                        }
                    ]
                }),
            )
            .await;
            Mock::given(method("GET"))
                .and(path("/dl/x86_64.tar.gz"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_bytes(tar_gz("kerbrute_1.0.3/kerbrute", b"ELF")),
                )
                .expect(1)
                .mount(&server)
                .await;

            let base = server.uri();
            let mode = tokio::task::spawn_blocking(move || {
                let (mut ctx, _root) = context(&base);
                install(&mut ctx, &TOOL, "ropnop/kerbrute", "kerbrute").unwrap();
                let dest = ctx.paths.bin_dir.join("kerbrute");
                assert_eq!(fs::read(&dest).unwrap(), b"ELF");
                fs::metadata(&dest).unwrap().permissions().mode()
            })
            .await
            .unwrap();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
