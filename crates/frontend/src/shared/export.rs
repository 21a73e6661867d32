//! Экспорт загруженных строк в CSV, который Excel открывает без мастера импорта.
//!
//! UTF-8 с BOM, разделитель `;`.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const SEPARATOR: &str = ";";

/// Тип, строки которого можно выгрузить в таблицу
pub trait ExcelExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

/// Ячейка с разделителем, кавычками или переводом строки оборачивается в кавычки
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(SEPARATOR) || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Текст CSV: BOM, заголовки, строки
pub fn build_csv<T: ExcelExportable>(data: &[T]) -> String {
    let mut csv = String::from('\u{FEFF}');
    csv.push_str(&T::headers().join(SEPARATOR));
    csv.push('\n');
    for item in data {
        let row: Vec<String> = item.to_csv_row().iter().map(|c| escape_csv_cell(c)).collect();
        csv.push_str(&row.join(SEPARATOR));
        csv.push('\n');
    }
    csv
}

/// Собирает CSV и отдаёт браузеру на скачивание
pub fn export_to_excel<T: ExcelExportable>(data: &[T], filename: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("Нет данных для экспорта".to_string());
    }
    let blob = create_csv_blob(&build_csv(data))?;
    download_blob(&blob, filename)
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Скачивание через временную ссылку `<a download>`
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, f64);

    impl ExcelExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Продавец", "Выручка"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), format!("{:.2}", self.1)]
        }
    }

    #[test]
    fn test_build_csv() {
        let csv = build_csv(&[Row("Shop; One", 10.5), Row("Say \"hi\"", 0.0)]);
        assert!(csv.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0], "Продавец;Выручка");
        assert_eq!(lines[1], "\"Shop; One\";10.50");
        assert_eq!(lines[2], "\"Say \"\"hi\"\"\";0.00");
    }
}
