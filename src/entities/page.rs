use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const NO_DESCRIPTION: &str = "no further information";

/// A geosearch hit. Ordered by title.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "PageSummary")]
pub struct Page {
    pub pageid: i64,
    pub title: String,
    pub terms: Option<HashMap<String, Vec<String>>>,
}

#[derive(Serialize)]
struct PageSummary {
    pageid: i64,
    title: String,
    description: String,
}

impl Page {
    pub fn description(&self) -> &str {
        self.terms
            .as_ref()
            .and_then(|terms| terms.get("description"))
            .and_then(|descriptions| descriptions.first())
            .map(|description| description.as_str())
            .unwrap_or(NO_DESCRIPTION)
    }
}

impl From<Page> for PageSummary {
    fn from(page: Page) -> Self {
        Self {
            description: page.description().to_string(),
            pageid: page.pageid,
            title: page.title,
        }
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Page {}

impl PartialOrd for Page {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Page {
    fn cmp(&self, other: &Self) -> Ordering {
        self.title
            .cmp(&other.title)
            .then(self.pageid.cmp(&other.pageid))
    }
}

#[test]
fn description_falls_back_when_terms_missing() {
    let page = Page {
        pageid: 1,
        title: "B".into(),
        terms: None,
    };
    assert_eq!(page.description(), "no further information");

    let page = Page {
        pageid: 1,
        title: "B".into(),
        terms: Some(HashMap::from([("label".to_string(), vec!["x".to_string()])])),
    };
    assert_eq!(page.description(), "no further information");

    let page = Page {
        pageid: 1,
        title: "B".into(),
        terms: Some(HashMap::from([("description".to_string(), vec![])])),
    };
    assert_eq!(page.description(), "no further information");
}

#[test]
fn description_uses_first_term() {
    let page = Page {
        pageid: 1,
        title: "B".into(),
        terms: Some(HashMap::from([(
            "description".to_string(),
            vec!["first".to_string(), "second".to_string()],
        )])),
    };
    assert_eq!(page.description(), "first");
}

#[test]
fn serializes_flattened_description() {
    let page = Page {
        pageid: 7,
        title: "Big Ben".into(),
        terms: None,
    };

    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "pageid": 7,
            "title": "Big Ben",
            "description": "no further information",
        })
    );
}
