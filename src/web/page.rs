//! HTML page generated from the dashboard's component tree.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::shell::Component;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1280px; padding: 12px; }
.selector { margin: 8px 0; }
.selector label { display: block; font-weight: bold; margin-bottom: 4px; }
.selector select { width: 80%; padding: 4px; font-size: 16px; }
.chart-row { display: flex; gap: 12px; margin-top: 12px; }
.chart { flex: 1 1 0; min-width: 0; }
.chart svg { width: 100%; height: auto; }
"#;

const SCRIPT: &str = r#"
const reportEl = document.getElementById('dropdown-statistics');
const yearEl = document.getElementById('select-year');
const outputEl = document.getElementById('output-container');

function currentValue(el) {
  return el.value === '' ? null : el.value;
}

function renderRows(rows) {
  outputEl.innerHTML = '';
  for (const row of rows) {
    const rowEl = document.createElement('div');
    rowEl.className = 'chart-row';
    for (const cell of row) {
      const chartEl = document.createElement('div');
      chartEl.className = 'chart';
      chartEl.innerHTML = cell.svg;
      rowEl.appendChild(chartEl);
    }
    outputEl.appendChild(rowEl);
  }
}

async function update(changed) {
  const resp = await fetch('/_dash-update-component', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ changed, report: currentValue(reportEl), year: currentValue(yearEl) }),
  });
  if (!resp.ok) {
    console.error('update failed', resp.status);
    return;
  }
  const body = await resp.json();
  for (const u of body.updates) {
    if (u.property === 'disabled') {
      document.getElementById(u.component).disabled = u.value;
    } else if (u.property === 'children') {
      renderRows(u.value.rows);
    }
  }
}

reportEl.addEventListener('change', () => update('dropdown-statistics'));
yearEl.addEventListener('change', () => update('select-year'));
update(null);
"#;

/// Full HTML document for `layout`.
pub fn render_page(title: &str, layout: &Component) -> String {
    let mut body = String::new();
    render_component(layout, &mut body);

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n<script>{SCRIPT}</script>\n</body>\n</html>\n",
        encode_text(title),
    )
}

fn render_component(component: &Component, out: &mut String) {
    match component {
        Component::Page { children } => {
            out.push_str("<main>\n");
            for child in children {
                render_component(child, out);
            }
            out.push_str("</main>\n");
        }
        Component::Heading { text, style } => {
            out.push_str(&format!(
                "<h1 style=\"text-align:{};color:{};font-size:{}px\">{}</h1>\n",
                style.text_align,
                style.color,
                style.font_size_px,
                encode_text(text),
            ));
        }
        Component::Section { children } => {
            out.push_str("<div class=\"selector\">\n");
            for child in children {
                render_component(child, out);
            }
            out.push_str("</div>\n");
        }
        Component::Label { text } => {
            out.push_str(&format!("<label>{}</label>\n", encode_text(text)));
        }
        Component::Dropdown {
            id,
            options,
            placeholder,
            disabled,
        } => {
            let disabled = if *disabled { " disabled" } else { "" };
            out.push_str(&format!("<select id=\"{}\"{disabled}>\n", id.as_str()));
            out.push_str(&format!(
                "<option value=\"\" selected>{}</option>\n",
                encode_text(placeholder)
            ));
            for option in options {
                out.push_str(&format!(
                    "<option value=\"{}\">{}</option>\n",
                    encode_double_quoted_attribute(&option.value),
                    encode_text(&option.label),
                ));
            }
            out.push_str("</select>\n");
        }
        Component::Output { id, class_name } => {
            out.push_str(&format!(
                "<div id=\"{}\" class=\"{}\"></div>\n",
                id.as_str(),
                encode_double_quoted_attribute(class_name),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shell::{ComponentId, Dashboard, TITLE};
    use crate::testutil::sample_table;

    fn page() -> String {
        let dash = Dashboard::new(Arc::new(sample_table()));
        render_page(TITLE, &dash.layout())
    }

    #[test]
    fn page_carries_every_component_id() {
        let html = page();
        for id in ComponentId::ALL {
            assert!(html.contains(&format!("id=\"{}\"", id.as_str())), "missing {id:?}");
        }
    }

    #[test]
    fn year_selector_starts_disabled_with_placeholder() {
        let html = page();
        assert!(html.contains("<select id=\"select-year\" disabled>"));
        assert!(html.contains("<select id=\"dropdown-statistics\">"));
        assert!(html.contains("<option value=\"\" selected>Select-year</option>"));
        assert!(html.contains("<option value=\"2023\">2023</option>"));
        assert!(html.contains("<option value=\"Recession Period Statistics\">"));
    }

    #[test]
    fn heading_is_styled() {
        let html = page();
        assert!(html.contains(
            "<h1 style=\"text-align:center;color:#503D36;font-size:24px\">Automobile Sales Statistics Dashboard</h1>"
        ));
    }

    #[test]
    fn option_markup_is_escaped() {
        let layout = Component::Page {
            children: vec![Component::Dropdown {
                id: ComponentId::ReportSelector,
                options: vec![crate::shell::DropdownOption::new("<b>&</b>", "a\"b")],
                placeholder: "<pick>".to_string(),
                disabled: false,
            }],
        };
        let html = render_page("T&T", &layout);
        assert!(html.contains("<title>T&amp;T</title>"));
        assert!(html.contains("<option value=\"a&quot;b\">&lt;b&gt;&amp;&lt;/b&gt;</option>"));
        assert!(html.contains("<option value=\"\" selected>&lt;pick&gt;</option>"));
    }
}
