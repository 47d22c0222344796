//! Import-text rewriting for generated auto-import edits.
//!
//! When a shadow declaration path is the import target, the host inserts a
//! module specifier pointing into build output (`../dist/x` instead of
//! `../x`). The rewrite recognizes the inserted import statement and
//! collapses the build-output segment out of the specifier.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Matches one import statement line and captures the quoted specifier.
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^(import .*?["'])([^"']*)(["'].*)$"#).expect("static import pattern")
});

/// Remove the first `/{segment}/` occurrence from the module specifier of
/// an import statement, collapsing the adjacent separators into one.
/// Text that is not an import statement, or has no such segment, is
/// returned unchanged.
pub fn rewrite_import_text(text: &str, segment: &str) -> String {
    let needle = format!("/{segment}/");
    IMPORT_RE
        .replace(text, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], caps[2].replacen(&needle, "/", 1), &caps[3])
        })
        .into_owned()
}

/// Completion-entry details from the host; only the `newText` of code
/// action edits is rewritten, everything else passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_actions: Option<Vec<CodeAction>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub changes: Vec<FileTextChanges>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTextChanges {
    pub file_name: String,
    pub text_changes: Vec<TextChange>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub span: Value,
    pub new_text: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Rewrite every inserted import in a details response. Details without
/// code actions or without an import source are returned untouched.
pub fn rewrite_completion_details(
    mut details: CompletionDetails,
    segment: &str,
) -> CompletionDetails {
    if details.source.is_none() {
        return details;
    }
    let Some(actions) = details.code_actions.as_mut() else {
        return details;
    };

    for action in actions {
        for change in &mut action.changes {
            for text_change in &mut change.text_changes {
                text_change.new_text = rewrite_import_text(&text_change.new_text, segment);
            }
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_dist_segment_from_specifier() {
        assert_eq!(
            rewrite_import_text(r#"import { X } from "../dist/x";"#, "dist"),
            r#"import { X } from "../x";"#
        );
    }

    #[test]
    fn single_quotes_and_trailing_newline_preserved() {
        assert_eq!(
            rewrite_import_text("import { X } from '../dist/sub/x';\n", "dist"),
            "import { X } from '../sub/x';\n"
        );
    }

    #[test]
    fn no_segment_is_a_no_op() {
        let text = r#"import { X } from "../x";"#;
        assert_eq!(rewrite_import_text(text, "dist"), text);
    }

    #[test]
    fn non_import_text_is_a_no_op() {
        let text = "const x = require('../dist/x');";
        assert_eq!(rewrite_import_text(text, "dist"), text);
    }

    #[test]
    fn only_first_occurrence_collapses() {
        assert_eq!(
            rewrite_import_text(r#"import { X } from "../dist/dist/x";"#, "dist"),
            r#"import { X } from "../dist/x";"#
        );
    }

    #[test]
    fn detected_segment_name_is_respected() {
        assert_eq!(
            rewrite_import_text(r#"import { X } from "../build/x";"#, "build"),
            r#"import { X } from "../x";"#
        );
    }

    #[test]
    fn details_without_source_or_actions_pass_through() {
        let details = CompletionDetails {
            source: None,
            code_actions: Some(vec![]),
            rest: Map::new(),
        };
        let out = rewrite_completion_details(details.clone(), "dist");
        assert_eq!(out, details);
    }

    #[test]
    fn details_rewrite_touches_only_new_text() {
        let json = r#"{
            "name": "X",
            "source": "/repo/pkg/dist/x.d.ts",
            "codeActions": [{
                "description": "Add import",
                "changes": [{
                    "fileName": "/repo/currentPkg/main.ts",
                    "textChanges": [{
                        "span": {"start": 0, "length": 0},
                        "newText": "import { X } from \"../pkg/dist/x\";\n"
                    }]
                }]
            }]
        }"#;
        let details: CompletionDetails = serde_json::from_str(json).unwrap();
        let out = rewrite_completion_details(details, "dist");

        let actions = out.code_actions.unwrap();
        let change = &actions[0].changes[0].text_changes[0];
        assert_eq!(change.new_text, "import { X } from \"../pkg/x\";\n");
        assert_eq!(change.span, serde_json::json!({"start": 0, "length": 0}));
        assert_eq!(
            actions[0].rest.get("description"),
            Some(&Value::from("Add import"))
        );
        assert_eq!(out.rest.get("name"), Some(&Value::from("X")));
    }
}
