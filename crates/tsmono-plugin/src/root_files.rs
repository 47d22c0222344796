//! Root-file-set expansion for dependency packages.
//!
//! The auto-import provider only indexes modules reachable from a
//! dependency's declared entry file. A package whose entry point re-exports
//! nothing leaves its internal modules unreachable, so for every eligible
//! root file we list the package's sources and append one shadow
//! declaration path per source file, mirroring where the emitted
//! declarations would live under `outDir`.

use std::path::Path;

use tsmono_config::ConfigHost;

use crate::session::{PluginSession, VENDOR_DIR_NAME};
use crate::ProjectHost;

const DECLARATION_SUFFIX: &str = ".d.ts";
const SOURCE_EXTENSIONS: &[&str] = &[".ts", ".tsx"];

/// Expand the host's dependency root-file list, registering each
/// discovered package source root in the session.
///
/// Every original root file is kept and shadows are appended after it.
/// Expansion is skipped for vendored paths and for paths without a
/// declaration suffix; a listing failure skips that item only.
pub fn expand_root_files(
    host: &dyn ProjectHost,
    config_host: &dyn ConfigHost,
    session: &mut PluginSession,
    initial: &[String],
) -> Vec<String> {
    let mut result = Vec::with_capacity(initial.len());

    for item in initial {
        result.push(item.clone());

        if item.contains(VENDOR_DIR_NAME) {
            continue;
        }
        if !item.ends_with(DECLARATION_SUFFIX) {
            continue;
        }

        let item_dir = parent_dir(item);
        let config = session
            .config_cache
            .resolve(config_host, Path::new(&item_dir));
        let config = config.as_deref();

        let out_dir = match config.and_then(|c| c.out_dir.as_deref()) {
            Some(dir) => {
                session.note_out_dir(dir);
                dir.to_string_lossy().into_owned()
            }
            None => item_dir.clone(),
        };
        let root_dir = config
            .and_then(|c| c.root_dir.as_deref())
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|| parent_dir(&item_dir));

        session.add_monorepo_root(root_dir.clone());

        let mut exclude = vec![VENDOR_DIR_NAME.to_string()];
        if let Some(globs) = config.and_then(|c| c.exclude.as_deref()) {
            exclude.extend(globs.iter().cloned());
        }
        let include = config.and_then(|c| c.include.as_deref());

        let files = match host.read_directory(
            Path::new(&root_dir),
            SOURCE_EXTENSIONS,
            &exclude,
            include,
        ) {
            Ok(files) => files,
            Err(error) => {
                tracing::warn!(root = %root_dir, %error, "skipping shadow expansion");
                continue;
            }
        };

        for file in &files {
            let Some(relative) = strip_dir_prefix(file, &root_dir) else {
                continue;
            };
            if let Some(shadow) = shadow_declaration_path(&out_dir, relative) {
                result.push(shadow);
            }
        }
    }

    result
}

/// Synthesize the declaration path a source file's emitted declaration
/// would have: `out_dir/relative` with `.ts`/`.tsx` turned into
/// `.d.ts`/`.d.tsx`. Non-source suffixes yield nothing.
pub fn shadow_declaration_path(out_dir: &str, relative: &str) -> Option<String> {
    if let Some(stem) = relative.strip_suffix(".tsx") {
        Some(format!("{out_dir}/{stem}.d.tsx"))
    } else if let Some(stem) = relative.strip_suffix(".ts") {
        Some(format!("{out_dir}/{stem}.d.ts"))
    } else {
        None
    }
}

fn parent_dir(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

fn strip_dir_prefix<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    path.strip_prefix(dir)?.strip_prefix('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};

    /// Host with a fixed listing per root directory.
    struct FixedHost {
        listings: Vec<(String, Vec<String>)>,
    }

    impl ProjectHost for FixedHost {
        fn current_directory(&self) -> String {
            "/repo/currentPkg".to_string()
        }

        fn read_directory(
            &self,
            root: &Path,
            _extensions: &[&str],
            _exclude: &[String],
            _include: Option<&[String]>,
        ) -> Result<Vec<String>> {
            let root = root.to_string_lossy();
            for (dir, files) in &self.listings {
                if dir.as_str() == root {
                    return Ok(files.clone());
                }
            }
            bail!("unreadable: {root}");
        }
    }

    /// Config host serving one tsconfig for /repo/pkg.
    struct PkgConfig;

    impl ConfigHost for PkgConfig {
        fn file_exists(&self, path: &Path) -> bool {
            path == Path::new("/repo/pkg/tsconfig.json")
        }

        fn read_file(&self, path: &Path) -> Option<String> {
            self.file_exists(path).then(|| {
                r#"{"compilerOptions": {"outDir": "dist", "rootDir": "src"}}"#.to_string()
            })
        }
    }

    fn pkg_host() -> FixedHost {
        FixedHost {
            listings: vec![(
                "/repo/pkg/src".to_string(),
                vec![
                    "/repo/pkg/src/a.ts".to_string(),
                    "/repo/pkg/src/sub/b.tsx".to_string(),
                ],
            )],
        }
    }

    #[test]
    fn shadows_mirror_out_dir_layout() {
        let mut session = PluginSession::new();
        let initial = vec!["/repo/pkg/dist/index.d.ts".to_string()];

        let result = expand_root_files(&pkg_host(), &PkgConfig, &mut session, &initial);

        assert_eq!(
            result,
            vec![
                "/repo/pkg/dist/index.d.ts".to_string(),
                "/repo/pkg/dist/a.d.ts".to_string(),
                "/repo/pkg/dist/sub/b.d.tsx".to_string(),
            ]
        );
    }

    #[test]
    fn originals_survive_expansion() {
        // Policy regression: eligible originals are kept, shadows appended.
        let mut session = PluginSession::new();
        let initial = vec![
            "/repo/pkg/dist/index.d.ts".to_string(),
            "/repo/other/main.ts".to_string(),
        ];

        let result = expand_root_files(&pkg_host(), &PkgConfig, &mut session, &initial);

        assert!(result.contains(&"/repo/pkg/dist/index.d.ts".to_string()));
        assert!(result.contains(&"/repo/other/main.ts".to_string()));
    }

    #[test]
    fn expansion_registers_the_source_root() {
        let mut session = PluginSession::new();
        let initial = vec!["/repo/pkg/dist/index.d.ts".to_string()];

        expand_root_files(&pkg_host(), &PkgConfig, &mut session, &initial);

        assert!(session.monorepo_roots().contains("/repo/pkg/src"));
        assert_eq!(session.dist_segment(), "dist");
    }

    #[test]
    fn vendored_and_non_declaration_paths_pass_through() {
        let mut session = PluginSession::new();
        let initial = vec![
            "/repo/node_modules/dep/index.d.ts".to_string(),
            "/repo/pkg/src/plain.ts".to_string(),
        ];

        let result = expand_root_files(&pkg_host(), &PkgConfig, &mut session, &initial);

        assert_eq!(result, initial);
        assert!(session.monorepo_roots().is_empty());
    }

    #[test]
    fn listing_failure_skips_only_that_item() {
        // No tsconfig anywhere: outDir falls back to the item's directory,
        // rootDir to its parent. /repo/broken has no listing; /repo/ok does.
        struct NoConfig;
        impl ConfigHost for NoConfig {
            fn file_exists(&self, _path: &Path) -> bool {
                false
            }
            fn read_file(&self, _path: &Path) -> Option<String> {
                None
            }
        }

        let host = FixedHost {
            listings: vec![(
                "/repo/ok".to_string(),
                vec!["/repo/ok/lib/x.ts".to_string()],
            )],
        };
        let mut session = PluginSession::new();
        let initial = vec![
            "/repo/broken/lib/index.d.ts".to_string(),
            "/repo/ok/lib/index.d.ts".to_string(),
        ];

        let result = expand_root_files(&host, &NoConfig, &mut session, &initial);

        assert_eq!(
            result,
            vec![
                "/repo/broken/lib/index.d.ts".to_string(),
                "/repo/ok/lib/index.d.ts".to_string(),
                "/repo/ok/lib/lib/x.d.ts".to_string(),
            ]
        );
    }

    #[test]
    fn shadow_suffix_rewrite() {
        assert_eq!(
            shadow_declaration_path("/repo/pkg/dist", "a.ts"),
            Some("/repo/pkg/dist/a.d.ts".to_string())
        );
        assert_eq!(
            shadow_declaration_path("/repo/pkg/dist", "sub/b.tsx"),
            Some("/repo/pkg/dist/sub/b.d.tsx".to_string())
        );
        assert_eq!(shadow_declaration_path("/repo/pkg/dist", "notes.md"), None);
    }

    #[test]
    fn parent_dir_of_paths() {
        assert_eq!(parent_dir("/repo/pkg/index.d.ts"), "/repo/pkg");
        assert_eq!(parent_dir("/index.d.ts"), "/");
        assert_eq!(parent_dir("bare"), "");
    }
}
