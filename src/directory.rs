//! Department directory record types: staff, student executives, faculty
//! and external learning resources. The records themselves are supplied
//! by the caller.

use serde::{Deserialize, Serialize};

use crate::search::{Query, Searchable};

const WEB_SEARCH_URL: &str = "https://www.google.com/search?q=";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub title: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub office: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Executive {
    pub position: String,
    pub name: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacultyMember {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceLink {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub link: String,
}

impl Searchable for StaffMember {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            Some(self.name.as_str()),
            self.email.as_deref(),
            self.office.as_deref(),
        ]
    }
}

impl Searchable for Executive {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.position.as_str()),
            Some(self.name.as_str()),
            self.year.as_deref(),
        ]
    }
}

impl Searchable for FacultyMember {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![
            Some(self.name.as_str()),
            Some(self.title.as_str()),
            self.specialization.as_deref(),
        ];
        fields.extend(self.qualifications.iter().map(|q| Some(q.as_str())));
        fields
    }
}

impl Searchable for ResourceLink {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.description.as_str()),
            Some(self.category.as_str()),
        ]
    }
}

/// Where the resources search box sends the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceTarget<'a> {
    Direct(&'a ResourceLink),
    WebSearch(String),
}

impl ResourceTarget<'_> {
    pub fn url(&self) -> &str {
        match self {
            ResourceTarget::Direct(resource) => &resource.link,
            ResourceTarget::WebSearch(url) => url,
        }
    }
}

/// First resource whose name contains the query, else a web search for
/// it. A blank query goes nowhere.
pub fn resolve_resource<'a>(resources: &'a [ResourceLink], query: &str) -> Option<ResourceTarget<'a>> {
    if query.trim().is_empty() {
        return None;
    }

    let needle = Query::new(query);
    let found = resources
        .iter()
        .find(|resource| needle.matches(&NameOnly(&resource.name)));

    Some(match found {
        Some(resource) => ResourceTarget::Direct(resource),
        None => ResourceTarget::WebSearch(format!(
            "{}{}",
            WEB_SEARCH_URL,
            urlencoding::encode(query)
        )),
    })
}

struct NameOnly<'a>(&'a str);

impl Searchable for NameOnly<'_> {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.0)]
    }
}
