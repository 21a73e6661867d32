//! Каталог категорий товаров.
//!
//! Дерево неизменно и строится один раз при первом обращении.
//! Подписи локализуются с откатом: запрошенная локаль → `en` → сам ключ.

mod data;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryNode {
    pub key: String,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub key: String,
    pub subcategories: Vec<SubcategoryNode>,
}

/// Дерево для фронтенда вместе с подписями в одной локали
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTree {
    pub locale: String,
    pub categories: Vec<CategoryNode>,
    pub labels: HashMap<String, String>,
}

impl TaxonomyTree {
    /// Подпись из загруженного дерева, ключ если подписи нет
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(key)
    }
}

struct Taxonomy {
    /// Порядок категорий как в исходных данных
    categories: Vec<&'static str>,
    subcategories: HashMap<&'static str, Vec<&'static str>>,
    sub_subcategories: HashMap<&'static str, HashMap<&'static str, Vec<&'static str>>>,
    keywords: HashMap<String, &'static str>,
    /// ключ → локаль → текст
    labels: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

static TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    let mut categories = Vec::new();
    let mut subcategories = HashMap::new();
    let mut sub_subcategories = HashMap::new();

    for (category, subs) in data::TREE {
        categories.push(*category);
        subcategories.insert(*category, subs.iter().map(|(s, _)| *s).collect());
        let leaves: HashMap<&'static str, Vec<&'static str>> = subs
            .iter()
            .map(|(sub, leaves)| (*sub, leaves.to_vec()))
            .collect();
        sub_subcategories.insert(*category, leaves);
    }

    let keywords = data::KEYWORDS
        .iter()
        .map(|(word, category)| (word.to_lowercase(), *category))
        .collect();

    let mut labels: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
    for (key, locale, text) in data::LABELS {
        labels.entry(*key).or_default().insert(*locale, *text);
    }

    Taxonomy {
        categories,
        subcategories,
        sub_subcategories,
        keywords,
        labels,
    }
});

/// Категории верхнего уровня
pub fn categories() -> &'static [&'static str] {
    &TAXONOMY.categories
}

/// Подкатегории категории; пусто для неизвестной категории
pub fn subcategories(category: &str) -> &'static [&'static str] {
    TAXONOMY
        .subcategories
        .get(category)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn sub_subcategories(category: &str, subcategory: &str) -> &'static [&'static str] {
    TAXONOMY
        .sub_subcategories
        .get(category)
        .and_then(|subs| subs.get(subcategory))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Категория, к которой относится поисковое слово.
/// Ключ категории тоже считается словом этой категории.
pub fn category_for_keyword(word: &str) -> Option<&'static str> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(category) = TAXONOMY.keywords.get(&needle) {
        return Some(*category);
    }
    TAXONOMY
        .categories
        .iter()
        .find(|c| **c == needle)
        .copied()
}

/// Проверка пути категория/подкатегория/под-подкатегория.
/// Отсутствующие уровни не проверяются.
pub fn is_valid_path(category: &str, subcategory: Option<&str>, sub_subcategory: Option<&str>) -> bool {
    if !TAXONOMY.subcategories.contains_key(category) {
        return false;
    }
    match (subcategory, sub_subcategory) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(sub), None) => subcategories(category).contains(&sub),
        (Some(sub), Some(leaf)) => sub_subcategories(category, sub).contains(&leaf),
    }
}

/// Подпись ключа: `locale` → `en` → сам ключ
pub fn localize(key: &str, locale: &str) -> String {
    let Some(translations) = TAXONOMY.labels.get(key) else {
        return key.to_string();
    };
    translations
        .get(locale)
        .or_else(|| translations.get(DEFAULT_LOCALE))
        .map(|text| text.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Всё дерево с подписями в указанной локали
pub fn tree(locale: &str) -> TaxonomyTree {
    let mut labels = HashMap::new();
    let mut nodes = Vec::with_capacity(categories().len());

    for category in categories() {
        labels.insert(category.to_string(), localize(category, locale));
        let mut subs = Vec::new();
        for sub in subcategories(category) {
            labels.insert(sub.to_string(), localize(sub, locale));
            let mut children = Vec::new();
            for leaf in sub_subcategories(category, sub) {
                labels.insert(leaf.to_string(), localize(leaf, locale));
                children.push(leaf.to_string());
            }
            subs.push(SubcategoryNode {
                key: sub.to_string(),
                children,
            });
        }
        nodes.push(CategoryNode {
            key: category.to_string(),
            subcategories: subs,
        });
    }

    TaxonomyTree {
        locale: locale.to_string(),
        categories: nodes,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategories_lookup() {
        assert!(categories().contains(&"home_living"));
        assert!(subcategories("home_living").contains(&"textiles"));
        assert!(subcategories("unknown").is_empty());
        assert!(sub_subcategories("home_living", "textiles").contains(&"carpets"));
        assert!(sub_subcategories("home_living", "phones").is_empty());
    }

    #[test]
    fn test_keyword_mapping() {
        assert_eq!(category_for_keyword("Kilim"), Some("home_living"));
        assert_eq!(category_for_keyword(" КОФЕ "), Some("supermarket"));
        assert_eq!(category_for_keyword("beauty"), Some("beauty"));
        assert_eq!(category_for_keyword("spaceship"), None);
        assert_eq!(category_for_keyword("  "), None);
    }

    #[test]
    fn test_localize_fallback_chain() {
        assert_eq!(localize("home_living", "tr"), "Ev & Yaşam");
        // Нет русского перевода → английский
        assert_eq!(localize("decor", "ru"), "Decor");
        // Неизвестная локаль → английский
        assert_eq!(localize("fashion", "de"), "Fashion");
        // Нет перевода вовсе → ключ
        assert_eq!(localize("sneakers", "tr"), "sneakers");
    }

    #[test]
    fn test_valid_path() {
        assert!(is_valid_path("fashion", None, None));
        assert!(is_valid_path("fashion", Some("shoes"), Some("boots")));
        assert!(!is_valid_path("fashion", Some("shoes"), Some("laptops")));
        assert!(!is_valid_path("fashion", None, Some("boots")));
        assert!(!is_valid_path("cars", None, None));
    }

    #[test]
    fn test_tree_contains_everything_with_labels() {
        let tree = tree("ru");
        assert_eq!(tree.categories.len(), categories().len());
        assert_eq!(tree.label("electronics"), "Электроника");
        assert_eq!(tree.label("audio"), "Audio");
        assert_eq!(tree.label("missing_key"), "missing_key");
        let fashion = &tree.categories[0];
        assert_eq!(fashion.key, "fashion");
        assert_eq!(fashion.subcategories[0].children[0], "dresses");
    }
}
