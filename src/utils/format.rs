// ============================================================================
// FORMAT - Formato de precios, fechas y texto para la UI
// ============================================================================

use chrono::{DateTime, Local, NaiveDateTime};

use crate::utils::constants::CURRENCY_SUFFIX;

/// Precio con dos decimales y sufijo de moneda: `1234.50 ₽`
pub fn format_price(value: f64) -> String {
    format!("{:.2} {}", value, CURRENCY_SUFFIX)
}

/// Parsea los `created_at` del API. El backend manda `isoformat()` sin
/// zona (naive, UTC implícito) o RFC 3339 completo
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Fecha legible `dd.mm.yyyy, HH:MM:SS`; si no se puede parsear se
/// devuelve el texto original
pub fn format_datetime(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Parseo tolerante de inputs numéricos: vacío o basura = 0
pub fn parse_number_or_zero(raw: &str) -> f64 {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Número "como JS": sin `.0` cuando es entero (`15`, `12.5`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Escapar HTML para texto que se inserta con `set_inner_html`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_has_two_decimals() {
        assert_eq!(format_price(1000.0), "1000.00 ₽");
        assert_eq!(format_price(899.996), "900.00 ₽");
    }

    #[test]
    fn naive_iso_timestamps_are_formatted() {
        assert_eq!(format_datetime("2024-03-05T14:07:09.123456"), "05.03.2024, 14:07:09");
        assert_eq!(format_datetime("2024-03-05T14:07:09"), "05.03.2024, 14:07:09");
        assert_eq!(format_datetime("ayer"), "ayer");
    }

    #[test]
    fn lenient_number_parsing() {
        assert_eq!(parse_number_or_zero(""), 0.0);
        assert_eq!(parse_number_or_zero("12,5"), 12.5);
        assert_eq!(parse_number_or_zero(" 30 "), 30.0);
        assert_eq!(parse_number_or_zero("NaN"), 0.0);
        assert_eq!(parse_number_or_zero("x"), 0.0);
    }

    #[test]
    fn numbers_drop_trailing_zero_fraction() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }
}
