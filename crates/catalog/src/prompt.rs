use crate::error::Result;
use crate::taxonomy::{Taxonomy, TaxonomyChoice, TaxonomyManager};

/// What to show when asking the user for a new taxonomy entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub message: String,
    pub placeholder: String,
}

impl PromptRequest {
    #[must_use]
    pub fn for_taxonomy(taxonomy: Taxonomy) -> Self {
        let (title, example) = match taxonomy {
            Taxonomy::Categories => ("New category", "Bakery"),
            Taxonomy::Units => ("New unit", "box"),
            Taxonomy::Stores => ("New store", "Corner shop"),
        };
        Self {
            title: title.to_string(),
            message: format!("Enter the {} name (e.g. {example}):", taxonomy.label()),
            placeholder: example.to_string(),
        }
    }
}

/// Asks the user for a string. `None` means the user cancelled.
pub trait ValuePrompt {
    fn ask(&mut self, request: &PromptRequest) -> Option<String>;
}

/// Turns a taxonomy choice into the value to store on the record.
///
/// A new entry typed by the user is trimmed, learned into the taxonomy and
/// returned. Cancelling (or typing only whitespace) keeps `previous`.
pub fn resolve_choice(
    taxonomies: &TaxonomyManager,
    taxonomy: Taxonomy,
    choice: TaxonomyChoice,
    previous: &str,
    prompt: &mut dyn ValuePrompt,
) -> Result<String> {
    match choice {
        TaxonomyChoice::Predefined(name) => Ok(name),
        TaxonomyChoice::RequestNew => {
            let answer = prompt
                .ask(&PromptRequest::for_taxonomy(taxonomy))
                .map(|answer| answer.trim().to_string())
                .filter(|answer| !answer.is_empty());
            match answer {
                Some(answer) => {
                    taxonomies.add_if_absent(taxonomy, &answer)?;
                    Ok(answer)
                }
                None => Ok(previous.to_string()),
            }
        }
    }
}
