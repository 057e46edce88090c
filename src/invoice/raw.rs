use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A row of the receivables table (`contas_receber`)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReceivableRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub sequencial_cr: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nome_fornecedor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub num_nf: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub valor_parcela: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub data_vencimento: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub data_quitacao: Option<String>,
}

/// A row of the fiscal notes table (`notas_fiscais`)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FiscalNoteRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cliente: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cod_cliente: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub numero_nf: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub valor_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub data_emissao: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status_entrega: Option<String>,
}

/// A raw record tagged with the source it came from
#[derive(Debug, Clone)]
pub enum RawRecord {
    Receivable(ReceivableRow),
    FiscalNote(FiscalNoteRow),
}

/// Accepts strings and numbers; anything else (and empty strings) is absent.
/// Whitespace-only text counts as present.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts numbers and numeric strings; anything else is absent.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
