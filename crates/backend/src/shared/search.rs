/// Поиск по строке таблицы: подстрока без учёта регистра хотя бы в одной колонке.
/// Пустой запрос пропускает все строки.
pub fn matches_search(fields: &[&str], query: Option<&str>) -> bool {
    let query = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return true,
    };
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches_search(&["John Doe"], None));
        assert!(matches_search(&["John Doe"], Some("   ")));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let fields = ["Michael Brown", "michael@example.com", "+1234567890"];
        assert!(matches_search(&fields, Some("BROWN")));
        assert!(matches_search(&fields, Some("example.com")));
        assert!(matches_search(&fields, Some("4567")));
        assert!(!matches_search(&fields, Some("wilson")));
    }
}
