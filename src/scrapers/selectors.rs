//! Selector candidates and the resolver that applies them.
//!
//! The ranking page markup is regenerated by the portal every so often and the
//! hashed class names change with it. Instead of one selector per field, each
//! field carries an ordered list of candidates: the first one that matches
//! inside a listing entry wins. Adding the selector for a new markup epoch is
//! a matter of pushing it to the front of the list (or to the YAML config).

use crate::error::ConfigError;
use crate::models::Field;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

/// Raw selector strings, per field, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub item: Vec<String>,
    pub rank: Vec<String>,
    pub title: Vec<String>,
    pub media: Vec<String>,
    pub date: Vec<String>,
    pub link: Vec<String>,
    pub comment: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: owned(&[".newsFeed_item", r#"li[class*="newsFeed_item"]"#]),
            rank: owned(&[".sc-1hy2mez-8", ".newsFeed_item_rankNum"]),
            title: owned(&[".sc-3ls169-0.dHAJpi", ".newsFeed_item_title"]),
            media: owned(&[".sc-1hy2mez-3", ".newsFeed_item_media"]),
            date: owned(&[".sc-1hy2mez-4", ".newsFeed_item_date", "time"]),
            link: owned(&[".newsFeed_item_link", "a[href]"]),
            comment: owned(&[".sc-1hy2mez-6", ".newsFeed_item_comment"]),
        }
    }
}

impl SelectorConfig {
    fn candidates(&self, field: Field) -> &[String] {
        match field {
            Field::Rank => &self.rank,
            Field::Title => &self.title,
            Field::Media => &self.media,
            Field::Date => &self.date,
            Field::Link => &self.link,
            Field::Comment => &self.comment,
        }
    }
}

/// An ordered list of compiled selectors for one field.
#[derive(Debug, Clone)]
pub struct Candidates {
    selectors: Vec<Selector>,
}

impl Candidates {
    /// Compile every candidate; any invalid selector rejects the whole list.
    pub fn compile(field: &'static str, raw: &[String]) -> Result<Self, ConfigError> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyCandidates(field));
        }
        let selectors = raw
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| ConfigError::Selector {
                    field,
                    selector: s.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// First descendant of `scope` matched by the highest-priority candidate
    /// that matches anything.
    pub fn resolve<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// All nodes matched by the first candidate that matches at least one.
    pub fn select_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let found: Vec<_> = scope.select(selector).collect();
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

/// Compiled selectors for a whole listing page.
#[derive(Debug, Clone)]
pub struct SelectorProfile {
    pub item: Candidates,
    fields: [Candidates; 6],
}

impl SelectorProfile {
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let item = Candidates::compile("item", &config.item)?;
        let [rank, title, media, date, link, comment] =
            Field::ALL.map(|field| Candidates::compile(field.name(), config.candidates(field)));
        Ok(Self {
            item,
            fields: [rank?, title?, media?, date?, link?, comment?],
        })
    }

    pub fn field(&self, field: Field) -> &Candidates {
        &self.fields[field.index()]
    }

    /// Resolve every field of a listing entry independently.
    pub fn resolve<'a>(&self, item: ElementRef<'a>) -> ResolvedItem<'a> {
        ResolvedItem {
            nodes: Field::ALL.map(|field| self.field(field).resolve(item)),
        }
    }
}

/// The sub-nodes found for one listing entry, `None` where nothing matched.
#[derive(Debug)]
pub struct ResolvedItem<'a> {
    nodes: [Option<ElementRef<'a>>; 6],
}

impl<'a> ResolvedItem<'a> {
    pub fn get(&self, field: Field) -> Option<ElementRef<'a>> {
        self.nodes[field.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn profile() -> SelectorProfile {
        SelectorProfile::compile(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_default_config_compiles() {
        profile();
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let mut config = SelectorConfig::default();
        config.media = vec![".ok".into(), "[[broken".into()];
        let err = SelectorProfile::compile(&config).unwrap_err();
        match err {
            ConfigError::Selector { field, selector, .. } => {
                assert_eq!(field, "media");
                assert_eq!(selector, "[[broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_candidates_are_rejected() {
        let mut config = SelectorConfig::default();
        config.rank.clear();
        assert!(matches!(
            SelectorProfile::compile(&config),
            Err(ConfigError::EmptyCandidates("rank"))
        ));
    }

    #[test]
    fn test_falls_back_to_later_candidate() {
        let html = Html::parse_fragment(
            r#"<li class="newsFeed_item"><span class="newsFeed_item_rankNum">7</span></li>"#,
        );
        let profile = profile();
        let item = profile.item.select_all(html.root_element());
        assert_eq!(item.len(), 1);
        let rank = profile.field(Field::Rank).resolve(item[0]).unwrap();
        assert_eq!(rank.text().collect::<String>(), "7");
    }

    #[test]
    fn test_first_candidate_wins_when_both_match() {
        let html = Html::parse_fragment(
            r#"<li class="newsFeed_item">
                 <span class="newsFeed_item_rankNum">old</span>
                 <span class="sc-1hy2mez-8">new</span>
               </li>"#,
        );
        let profile = profile();
        let item = profile.item.select_all(html.root_element())[0];
        let rank = profile.field(Field::Rank).resolve(item).unwrap();
        assert_eq!(rank.text().collect::<String>(), "new");
    }

    #[test]
    fn test_missing_field_does_not_block_others() {
        let html = Html::parse_fragment(
            r#"<li class="newsFeed_item">
                 <span class="sc-1hy2mez-8">1</span>
                 <span class="sc-1hy2mez-3">共同通信</span>
               </li>"#,
        );
        let profile = profile();
        let item = profile.item.select_all(html.root_element())[0];
        let resolved = profile.resolve(item);
        assert!(resolved.get(Field::Rank).is_some());
        assert!(resolved.get(Field::Media).is_some());
        assert!(resolved.get(Field::Date).is_none());
        assert!(resolved.get(Field::Comment).is_none());
    }

    #[test]
    fn test_item_falls_back_to_later_candidate() {
        let html = Html::parse_fragment(
            r#"<ul>
                 <li class="newsFeed_itemV2"><span class="sc-1hy2mez-8">3</span></li>
                 <li class="newsFeed_itemV2"><span class="sc-1hy2mez-8">4</span></li>
               </ul>"#,
        );
        let profile = profile();
        let items = profile.item.select_all(html.root_element());
        assert_eq!(items.len(), 2);
        let ranks: Vec<String> = items
            .iter()
            .map(|item| {
                let rank = profile.field(Field::Rank).resolve(*item).unwrap();
                rank.text().collect()
            })
            .collect();
        assert_eq!(ranks, ["3", "4"]);
    }

    #[test]
    fn test_no_item_candidate_matches() {
        let html = Html::parse_fragment(r#"<div class="rankingList"><p>empty</p></div>"#);
        assert!(profile().item.select_all(html.root_element()).is_empty());
    }
}
