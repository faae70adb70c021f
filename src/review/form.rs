use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::ReviewResult,
    review::draft::{Field, ReviewDraft},
};

/// Raw form values as submitted, e.g. from a JSON file.
///
/// Missing keys read as empty inputs. The score may be given as a number or as the string a
/// number input would hold.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewForm {
    pub title: String,
    pub release_info: String,
    pub tags: String,
    pub score: Option<ScoreInput>,
    pub review_text: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

impl ScoreInput {
    fn as_input(&self) -> String {
        match self {
            ScoreInput::Number(n) => n.to_string(),
            ScoreInput::Text(s) => s.clone(),
        }
    }
}

impl ReviewForm {
    pub fn from_json_str(s: &str) -> ReviewResult<Self> {
        let form = serde_json::from_str(s).context("parse review form JSON")?;
        Ok(form)
    }

    pub fn from_path(path: &Path) -> ReviewResult<Self> {
        let f = File::open(path).with_context(|| format!("open review form '{}'", path.display()))?;
        let form = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse review form '{}'", path.display()))?;
        Ok(form)
    }

    /// The form as a sequence of field updates, in form order.
    pub fn updates(&self) -> Vec<(Field, String)> {
        vec![
            (Field::Title, self.title.clone()),
            (Field::ReleaseInfo, self.release_info.clone()),
            (Field::Tags, self.tags.clone()),
            (
                Field::Score,
                self.score.as_ref().map(ScoreInput::as_input).unwrap_or_default(),
            ),
            (Field::ReviewText, self.review_text.clone()),
        ]
    }

    /// Fold every field of the form into `draft`.
    pub fn apply(&self, draft: ReviewDraft) -> ReviewDraft {
        self.updates()
            .into_iter()
            .fold(draft, |d, (field, value)| d.with_field(field, &value))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/review/form.rs"]
mod tests;
