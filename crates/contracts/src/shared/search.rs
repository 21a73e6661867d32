//! Клиентский поиск по уже загруженным данным.
//!
//! Поиск никогда не обращается к серверу: фильтруются только строки,
//! которые уже есть в памяти страницы.

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// Значения полей, по которым выполняется поиск
    fn search_fields(&self) -> Vec<&str>;

    /// Проверяет, соответствует ли объект поисковому запросу
    fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Фильтрует список по поисковому запросу (без учёта регистра, по подстроке).
/// Пустой запрос возвращает весь список без изменений.
pub fn filter_by_search<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    if term.trim().is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.matches_search(term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Seller {
        id: &'static str,
        name: &'static str,
    }

    impl Searchable for Seller {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.id, self.name]
        }
    }

    fn sellers() -> Vec<Seller> {
        vec![
            Seller { id: "s-001", name: "Anadolu Tekstil" },
            Seller { id: "s-002", name: "Bosphorus Home" },
            Seller { id: "s-003", name: "Çiçek Market" },
            Seller { id: "x-777", name: "Home & Garden" },
        ]
    }

    #[test]
    fn test_empty_term_returns_everything() {
        assert_eq!(filter_by_search(&sellers(), ""), sellers());
        assert_eq!(filter_by_search(&sellers(), "   "), sellers());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let found = filter_by_search(&sellers(), "HOME");
        let ids: Vec<&str> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s-002", "x-777"]);
    }

    #[test]
    fn test_matches_by_id() {
        let found = filter_by_search(&sellers(), "x-7");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Home & Garden");
    }

    #[test]
    fn test_unicode_lowercase() {
        let found = filter_by_search(&sellers(), "ÇİÇ");
        assert!(found.is_empty());
        let found = filter_by_search(&sellers(), "çiçek");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "s-003");
    }

    #[test]
    fn test_no_matches() {
        assert!(filter_by_search(&sellers(), "zzz").is_empty());
    }

    #[test]
    fn test_term_is_trimmed() {
        assert_eq!(filter_by_search(&sellers(), "  market ").len(), 1);
    }
}
