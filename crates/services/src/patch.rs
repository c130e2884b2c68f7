//! # Patch Applier
//!
//! Interprets an ordered sequence of `replace` operations against a post.
//! Every wire-level operation is resolved into a typed field replacement
//! before anything is applied, so a structural failure anywhere in the
//! sequence rejects the whole patch and the caller's post stays untouched.

use domains::{BlogError, Category, PatchOp, Post, Result, Tag, MAX_CONTENT_LEN};
use serde_json::Value;

/// A type-checked replacement of one mutable post field.
#[derive(Debug, Clone)]
enum FieldReplace {
    Title(String),
    Content(String),
    Image(Option<String>),
    CategoryId(i32),
    AuthorId(i32),
    /// Assigned verbatim. The service reloads `category` from the
    /// `categoryId` foreign key after persisting, so this replacement only
    /// survives until the reload step.
    Category(Category),
    /// Assigned verbatim; patched tags are never re-resolved against
    /// storage, unlike the create/update paths.
    Tags(Vec<Tag>),
}

impl FieldReplace {
    fn apply_to(self, post: &mut Post) {
        match self {
            FieldReplace::Title(v) => post.title = v,
            FieldReplace::Content(v) => post.content = v,
            FieldReplace::Image(v) => post.image = v,
            FieldReplace::CategoryId(v) => post.category_id = v,
            FieldReplace::AuthorId(v) => post.author_id = v,
            FieldReplace::Category(v) => post.category = Some(v),
            FieldReplace::Tags(v) => post.tags = Some(v),
        }
    }
}

/// Applies `ops` in order onto `post`. Later operations overwrite earlier
/// ones. All-or-nothing: any resolution failure returns the error without
/// applying anything.
pub fn apply(post: Post, ops: &[PatchOp]) -> Result<Post> {
    let replaces = ops.iter().map(resolve).collect::<Result<Vec<_>>>()?;

    let mut patched = post;
    for replace in replaces {
        replace.apply_to(&mut patched);
    }
    Ok(patched)
}

/// Resolves one wire operation into its typed replacement. Paths accept an
/// optional leading slash and are matched case-insensitively, so both
/// `/categoryId` and `CategoryId` address the same field.
fn resolve(op: &PatchOp) -> Result<FieldReplace> {
    if !op.op.eq_ignore_ascii_case("replace") {
        return Err(BlogError::UnsupportedPatchOp(op.op.clone()));
    }

    let path = op.path.trim_start_matches('/');
    match path.to_ascii_lowercase().as_str() {
        "title" => Ok(FieldReplace::Title(expect_string(path, &op.value)?)),
        "content" => {
            let content = expect_string(path, &op.value)?;
            if content.chars().count() > MAX_CONTENT_LEN {
                return Err(BlogError::Validation(format!(
                    "content must not be more than {MAX_CONTENT_LEN} characters"
                )));
            }
            Ok(FieldReplace::Content(content))
        }
        "image" => match &op.value {
            Value::Null => Ok(FieldReplace::Image(None)),
            Value::String(s) => Ok(FieldReplace::Image(Some(s.clone()))),
            _ => Err(mismatch(path, "a string or null")),
        },
        "categoryid" => Ok(FieldReplace::CategoryId(expect_id(path, &op.value)?)),
        "authorid" => Ok(FieldReplace::AuthorId(expect_id(path, &op.value)?)),
        "category" => serde_json::from_value::<Category>(op.value.clone())
            .map(FieldReplace::Category)
            .map_err(|_| mismatch(path, "an {id, name} object")),
        "tags" => serde_json::from_value::<Vec<Tag>>(op.value.clone())
            .map(FieldReplace::Tags)
            .map_err(|_| mismatch(path, "an array of {id, name} objects")),
        _ => Err(BlogError::UnknownPatchPath(op.path.clone())),
    }
}

fn expect_string(path: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(path, "a string"))
}

fn expect_id(path: &str, value: &Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| mismatch(path, "an integer"))
}

fn mismatch(path: &str, expected: &'static str) -> BlogError {
    BlogError::PatchValueMismatch {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn replace(path: &str, value: Value) -> PatchOp {
        PatchOp {
            op: "replace".into(),
            path: path.into(),
            value,
        }
    }

    fn sample_post() -> Post {
        Post {
            id: 1,
            title: "Travel".into(),
            content: "Some of the most beautiful things to do".into(),
            category_id: 1,
            author_id: 1,
            image: None,
            category: None,
            author: None,
            tags: Some(vec![Tag {
                id: 1,
                name: "Travel".into(),
            }]),
        }
    }

    #[test]
    fn replaces_a_scalar_field_and_nothing_else() {
        let before = sample_post();
        let patched = apply(before.clone(), &[replace("categoryId", json!(2))]).unwrap();

        assert_eq!(patched.category_id, 2);
        assert_eq!(patched.title, before.title);
        assert_eq!(patched.content, before.content);
        assert_eq!(patched.author_id, before.author_id);
        assert_eq!(patched.tags, before.tags);
    }

    #[test]
    fn paths_tolerate_leading_slash_and_casing() {
        let patched = apply(sample_post(), &[replace("/CategoryId", json!(2))]).unwrap();
        assert_eq!(patched.category_id, 2);
    }

    #[test]
    fn later_operations_overwrite_earlier_ones() {
        let patched = apply(
            sample_post(),
            &[
                replace("title", json!("first")),
                replace("title", json!("second")),
            ],
        )
        .unwrap();
        assert_eq!(patched.title, "second");
    }

    #[test]
    fn unknown_path_rejects_the_whole_patch() {
        let err = apply(
            sample_post(),
            &[
                replace("title", json!("kept?")),
                replace("slug", json!("nope")),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::UnknownPatchPath(ref p) if p == "slug"));
    }

    #[test]
    fn mistyped_value_rejects_the_whole_patch() {
        let err = apply(sample_post(), &[replace("categoryId", json!("two"))]).unwrap_err();
        assert!(err.is_patch_structural());
    }

    #[test]
    fn non_replace_ops_are_rejected() {
        let err = apply(
            sample_post(),
            &[PatchOp {
                op: "remove".into(),
                path: "title".into(),
                value: Value::Null,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, BlogError::UnsupportedPatchOp(ref op) if op == "remove"));
    }

    #[test]
    fn image_accepts_null_to_clear() {
        let mut post = sample_post();
        post.image = Some("https://example.com/old.jpg".into());
        let patched = apply(post, &[replace("image", Value::Null)]).unwrap();
        assert!(patched.image.is_none());
    }

    #[test]
    fn tags_are_assigned_verbatim_without_resolution() {
        // Tag 99 exists nowhere; the applier takes the caller's word for it.
        let patched = apply(
            sample_post(),
            &[replace(
                "tags",
                json!([{ "id": 99, "name": "Imaginary" }]),
            )],
        )
        .unwrap();
        assert_eq!(
            patched.tags,
            Some(vec![Tag {
                id: 99,
                name: "Imaginary".into()
            }])
        );
    }

    #[test]
    fn content_over_length_is_a_validation_error() {
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        let err = apply(sample_post(), &[replace("content", json!(long))]).unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)));
    }
}
