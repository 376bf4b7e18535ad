use crate::model::LookupResult;
use crate::money::format_brl;

/// One labelled line of a rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub label: &'static str,
    pub value: String,
    /// Monetary rows are drawn as a list under the header rows.
    pub amount: bool,
}

/// Display projection of a lookup result.
///
/// Built the same way for a fresh response and for a history replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub rows: Vec<CardRow>,
}

impl ResultCard {
    pub fn header_rows(&self) -> impl Iterator<Item = &CardRow> {
        self.rows.iter().filter(|r| !r.amount)
    }

    pub fn amount_rows(&self) -> impl Iterator<Item = &CardRow> {
        self.rows.iter().filter(|r| r.amount)
    }

    /// Plain text form, one `label: value` per line.
    pub fn to_plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|r| format!("{}: {}", r.label, r.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<&LookupResult> for ResultCard {
    fn from(result: &LookupResult) -> Self {
        let header = |label, value: &str| CardRow {
            label,
            value: value.to_string(),
            amount: false,
        };
        let amount = |label, value: f64| CardRow {
            label,
            value: format_brl(value),
            amount: true,
        };

        Self {
            rows: vec![
                header("Município", &result.entity_label),
                header("Período", &result.period_label),
                amount("FPM", result.fpm),
                amount("Royalties", result.royalties),
                amount("Todos os Benefícios", result.todos),
            ],
        }
    }
}
