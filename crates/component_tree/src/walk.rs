use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use path_slash::PathBufExt;

use crate::cfg::ComponentTreeConfig;

/// Source files found under a root directory, in discovery order
#[derive(Debug, Default)]
pub struct WalkedSources {
    /// Sorted by slash-separated path, so every run sees the same order
    pub files: Vec<PathBuf>,
    /// Entries that could not be read. The walk continues past them.
    pub errors: Vec<String>,
}

/// Walks `root` and returns every source file below it.
///
/// Hidden entries, `node_modules`, `.git`, and anything matching a `skip`
/// glob are not descended into.
pub fn walk_source_files(root: &Path, config: &ComponentTreeConfig) -> WalkedSources {
    if !root.is_dir() {
        return WalkedSources {
            files: vec![],
            errors: vec![format!("{} is not a readable directory", root.display())],
        };
    }

    let visitor_config = config.clone();
    let walk_dir = WalkDir::new(root)
        .sort(true)
        .process_read_dir(move |_dir_state, children| {
            children.retain(|dir_entry_result| match dir_entry_result {
                Ok(dir_entry) => match dir_entry.file_name.to_str() {
                    Some(name) => !visitor_config.is_skipped_name(name),
                    None => false,
                },
                // keep errors so they are reported by the iterator
                Err(_) => true,
            });
        });

    let mut walked = WalkedSources::default();
    for entry in walk_dir {
        match entry {
            Ok(entry) => {
                if entry.file_type.is_file() && config.is_source_file(&entry.path()) {
                    walked.files.push(entry.path());
                }
            }
            Err(e) => walked.errors.push(format!("error during walkdir: {e}")),
        }
    }

    walked
        .files
        .sort_by_cached_key(|path| path.to_slash_lossy().into_owned());
    walked
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    use super::walk_source_files;
    use crate::cfg::{ComponentTreeConfig, ComponentTreeJSONConfig};

    #[test]
    fn test_walk_filters_and_sorts() {
        let tmpdir = test_tmpdir!(
            "src/pages/Settings.tsx" => "export const Settings = () => <div />;",
            "src/App.tsx" => "export const App = () => <div />;",
            "src/main.jsx" => "",
            "src/styles.css" => "",
            "src/node_modules/lib/index.js" => "",
            "src/.cache/App.js" => "",
            "src/util.ts" => "",
        );

        let walked = walk_source_files(&tmpdir.root_join("src"), &ComponentTreeConfig::default());
        let found = walked
            .files
            .iter()
            .map(|path| tmpdir.normalize(path))
            .collect::<Vec<_>>();

        assert_eq!(
            found,
            vec![
                "<root>/src/App.tsx",
                "<root>/src/main.jsx",
                "<root>/src/pages/Settings.tsx",
                "<root>/src/util.ts",
            ]
        );
        assert!(walked.errors.is_empty());
    }

    #[test]
    fn test_walk_respects_skip_globs() {
        let tmpdir = test_tmpdir!(
            "src/App.tsx" => "",
            "src/__mocks__/Header.tsx" => "",
            "src/Header.stories.tsx" => "",
        );
        let config: ComponentTreeConfig = ComponentTreeJSONConfig {
            skip: vec!["__mocks__".to_string(), "*.stories.tsx".to_string()],
            ..Default::default()
        }
        .try_into()
        .unwrap();

        let walked = walk_source_files(&tmpdir.root_join("src"), &config);
        let found = walked
            .files
            .iter()
            .map(|path| tmpdir.normalize(path))
            .collect::<Vec<_>>();

        assert_eq!(found, vec!["<root>/src/App.tsx"]);
    }

    #[test]
    fn test_walk_missing_root_reports_error() {
        let tmpdir = test_tmpdir!("README.md" => "");

        let walked = walk_source_files(&tmpdir.root_join("src"), &ComponentTreeConfig::default());

        assert!(walked.files.is_empty());
        assert_eq!(walked.errors.len(), 1);
    }
}
