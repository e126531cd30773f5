//! Name search over the in-memory equipment collection

use crate::features::equipment::models::Equipment;

/// Case-insensitive substring match on the equipment name
#[derive(Debug, Clone)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// An empty query matches every record
    pub fn matches(&self, equipment: &Equipment) -> bool {
        self.needle.is_empty() || equipment.name.to_lowercase().contains(&self.needle)
    }
}

/// Records whose name contains `query`, in their original order
pub fn filter_by_name<'a>(records: &'a [Equipment], query: &str) -> Vec<&'a Equipment> {
    let filter = NameFilter::new(query);
    records.iter().filter(|r| filter.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::equipment::models::{DocumentSetSlot, DocumentSlot};
    use chrono::Utc;
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use uuid::Uuid;

    fn equipment(name: &str) -> Equipment {
        Equipment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            serial_number: "SN".to_string(),
            order: DocumentSlot::default(),
            acceptance: DocumentSlot::default(),
            donation: DocumentSlot::default(),
            technical_state: DocumentSetSlot::default(),
            location: String::new(),
            responsible: String::new(),
            created_at: Utc::now(),
        }
    }

    fn ids(records: &[&Equipment]) -> Vec<Uuid> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let records: Vec<Equipment> = (0..20)
            .map(|_| equipment(&Word().fake::<String>()))
            .collect();

        let filtered = filter_by_name(&records, "");

        assert_eq!(filtered.len(), records.len());
        assert_eq!(
            ids(&filtered),
            records.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let records = vec![
            equipment("Ranets-E"),
            equipment("Bukovel-AD"),
            equipment("Kvertus"),
        ];

        let filtered = filter_by_name(&records, "ranets");
        assert_eq!(ids(&filtered), vec![records[0].id]);

        let filtered = filter_by_name(&records, "V");
        assert_eq!(ids(&filtered), vec![records[1].id, records[2].id]);

        assert!(filter_by_name(&records, "zzz").is_empty());
    }

    #[test]
    fn test_cyrillic_names_match_case_insensitively() {
        let records = vec![equipment("Буковель-АД"), equipment("Нота")];

        let filtered = filter_by_name(&records, "буков");

        assert_eq!(ids(&filtered), vec![records[0].id]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records: Vec<Equipment> = (0..30)
            .map(|_| equipment(&Word().fake::<String>()))
            .collect();
        let query: String = Word().fake::<String>().chars().take(2).collect();

        let once: Vec<Equipment> = filter_by_name(&records, &query)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_by_name(&once, &query);

        assert_eq!(ids(&twice), once.iter().map(|r| r.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_leaves_input_untouched() {
        let records = vec![equipment("b"), equipment("a"), equipment("ab")];
        let before = records.clone();

        let _ = filter_by_name(&records, "a");

        assert_eq!(records, before);
    }
}
