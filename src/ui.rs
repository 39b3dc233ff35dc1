use crate::charts::{bar_chart, line_chart, ChartPoint};
use crate::format::CurrencyFormatter;
use crate::metrics::bar_width;
use crate::models::{DashboardView, ProductSeries, RankedRow};
use crate::panels::{DataSource, FetchState, PanelData};
use chrono::NaiveDate;

pub fn render_statistics(state: &FetchState, money: &CurrencyFormatter, today: NaiveDate) -> String {
    let source = DataSource::Statistics;
    let body = match state {
        FetchState::Loading => skeleton(),
        FetchState::Loaded(PanelData::Statistics(view)) => statistics_body(view, money, today),
        FetchState::Loaded(_) => failed(&source),
        FetchState::Empty => empty(
            "No hay datos de estadísticas",
            "Verifica que existan registros en el backend.",
            &source,
        ),
        FetchState::Failed => failed(&source),
    };
    page("Dashboard de Ventas", &body, state.is_loading())
}

pub fn render_purchases(state: &FetchState) -> String {
    let source = DataSource::Purchases;
    let body = match state {
        FetchState::Loading => skeleton(),
        FetchState::Loaded(PanelData::Purchases(list)) => format!(
            r#"<header class="page-header"><h2>🛒 Compras</h2>{refresh}</header>
<section class="card">{list}</section>"#,
            refresh = refresh_button(&source),
            list = ranked_list(&list.rows, list.max_quantity, "compras"),
        ),
        FetchState::Loaded(_) => failed(&source),
        FetchState::Empty => empty(
            "No hay compras registradas",
            "Verifica que existan registros en el backend.",
            &source,
        ),
        FetchState::Failed => failed(&source),
    };
    page("Compras", &body, state.is_loading())
}

pub fn render_product_sales(state: &FetchState, product_id: &str) -> String {
    let source = DataSource::ProductSales(product_id.to_string());
    let body = match state {
        FetchState::Loading => skeleton(),
        FetchState::Loaded(PanelData::ProductSales(series)) => product_body(series),
        FetchState::Loaded(_) => failed(&source),
        FetchState::Empty => empty(
            "Este producto no tiene ventas registradas",
            "Verifica que existan registros en el backend.",
            &source,
        ),
        FetchState::Failed => failed(&source),
    };
    page(&format!("Producto {product_id}"), &body, state.is_loading())
}

fn statistics_body(view: &DashboardView, money: &CurrencyFormatter, today: NaiveDate) -> String {
    let points: Vec<ChartPoint> = view
        .monthly
        .iter()
        .map(|month| ChartPoint {
            label: month.month_label.clone(),
            value: month.amount,
        })
        .collect();

    let rows: Vec<RankedRow> = view
        .products
        .iter()
        .map(|product| RankedRow {
            name: product.name.clone(),
            quantity: product.quantity,
        })
        .collect();

    format!(
        r#"<header class="page-header">
  <h2>📊 Dashboard de Ventas</h2>
  <span class="muted">Actualizado {updated}</span>
</header>
<section class="kpis">
  {total}
  {products}
  {months}
  {average}
</section>
<section class="columns">
  <div class="card wide">
    <div class="card-title"><h3>📅 Ventas por Mes</h3><span class="muted">{count} puntos</span></div>
    {chart}
  </div>
  <div class="card">
    <h3>🔥 Productos Más Vendidos</h3>
    {ranked}
  </div>
</section>
{refresh}"#,
        updated = today.format("%d/%m/%Y"),
        total = stat_card("Total de Ventas", &money.format(view.total_sales)),
        products = stat_card("Productos listados", &view.products.len().to_string()),
        months = stat_card("Meses en gráfico", &view.monthly.len().to_string()),
        average = stat_card("Promedio mensual", &money.format(view.average_monthly)),
        count = view.monthly.len(),
        chart = bar_chart(&points, |value| money.format(value)),
        ranked = ranked_list(&rows, view.max_product_quantity, "ventas"),
        refresh = refresh_button(&DataSource::Statistics),
    )
}

fn product_body(series: &ProductSeries) -> String {
    let points: Vec<ChartPoint> = series
        .points
        .iter()
        .map(|point| ChartPoint {
            label: point.label.clone(),
            value: point.quantity as f64,
        })
        .collect();
    let source = DataSource::ProductSales(series.product_id.clone());

    format!(
        r#"<header class="page-header"><h2>📈 Ventas del producto {id}</h2>{refresh}</header>
<section class="kpis">
  {total}
  {average}
  {count}
</section>
<section class="card">{chart}</section>"#,
        id = escape_html(&series.product_id),
        refresh = refresh_button(&source),
        total = stat_card("Unidades vendidas", &series.total_quantity.to_string()),
        average = stat_card("Promedio por registro", &format!("{:.0}", series.average_quantity)),
        count = stat_card("Registros", &series.points.len().to_string()),
        chart = line_chart(&points, |value| format!("{value:.0}")),
    )
}

fn stat_card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="stat"><span class="label">{}</span><span class="value">{}</span></div>"#,
        escape_html(label),
        escape_html(value)
    )
}

/// Position, name, count and a bar proportional to `max_quantity`.
fn ranked_list(rows: &[RankedRow], max_quantity: u64, unit: &str) -> String {
    if rows.is_empty() {
        return r#"<p class="muted">Sin registros</p>"#.to_string();
    }

    let items: String = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            format!(
                r#"<li><span class="rank">{position}</span><div class="grow"><div class="row-head"><span class="name">{name}</span><span class="muted">{quantity} {unit}</span></div><div class="track"><div class="fill" style="width: {width:.2}%"></div></div></div></li>"#,
                position = index + 1,
                name = escape_html(&row.name),
                quantity = row.quantity,
                width = bar_width(row.quantity, max_quantity),
            )
        })
        .collect();
    format!(r#"<ul class="ranked">{items}</ul>"#)
}

fn skeleton() -> String {
    let cards = r#"<div class="stat"><span class="bone short"></span><span class="bone"></span></div>"#.repeat(4);
    let lines = r#"<span class="bone line"></span>"#.repeat(5);
    format!(
        r#"<div class="skeleton" aria-busy="true">
<span class="bone title"></span>
<section class="kpis">{cards}</section>
<section class="columns"><div class="card wide"><span class="bone chart"></span></div><div class="card">{lines}</div></section>
</div>"#
    )
}

fn empty(title: &str, hint: &str, source: &DataSource) -> String {
    format!(
        r#"<section class="notice"><div class="badge">📉</div><h3>{}</h3><p class="muted">{}</p>{}</section>"#,
        escape_html(title),
        escape_html(hint),
        refresh_button(source)
    )
}

fn failed(source: &DataSource) -> String {
    format!(
        r#"<section class="notice error"><div class="badge">⚠️</div><h3>No se pudieron cargar los datos</h3><p class="muted">Intenta de nuevo en unos momentos.</p>{}</section>"#,
        refresh_button(source)
    )
}

fn refresh_button(source: &DataSource) -> String {
    format!(
        r#"<form method="post" action="{}"><button type="submit">Actualizar</button></form>"#,
        escape_html(&refresh_path(source))
    )
}

pub fn page_path(source: &DataSource) -> String {
    match source {
        DataSource::Statistics => "/".to_string(),
        DataSource::Purchases => "/compras".to_string(),
        DataSource::ProductSales(id) => format!("/productos/{}", urlencoding::encode(id)),
    }
}

pub fn refresh_path(source: &DataSource) -> String {
    match source {
        DataSource::Statistics => "/refresh".to_string(),
        other => format!("{}/refresh", page_path(other)),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str, loading: bool) -> String {
    let head_extra = if loading {
        r#"<meta http-equiv="refresh" content="1" />"#
    } else {
        ""
    };
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{HEAD_EXTRA}}", head_extra)
        .replace("{{BODY}}", body)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{HEAD_EXTRA}}
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f9fafb;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --line: #f3f4f6;
      --accent: #8884d8;
      --bar: rgba(17, 24, 39, 0.8);
      --error: #c63b2b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
    }

    nav {
      display: flex;
      gap: 16px;
      padding: 16px 24px;
      background: var(--card);
      border-bottom: 1px solid var(--line);
    }

    nav a {
      color: var(--ink);
      text-decoration: none;
      font-weight: 600;
    }

    main {
      max-width: 1152px;
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      gap: 24px;
    }

    .page-header,
    .card-title,
    .row-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h2,
    h3 {
      margin: 0;
    }

    .muted {
      color: var(--muted);
      font-size: 0.85rem;
      margin: 0;
    }

    .kpis {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat,
    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 16px;
      padding: 20px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 700;
    }

    .columns {
      display: grid;
      grid-template-columns: 2fr 1fr;
      gap: 24px;
    }

    .chart {
      width: 100%;
      height: 320px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(31, 41, 55, 0.12);
      stroke-dasharray: 3 3;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .ranked {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 12px;
    }

    .ranked li {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    .rank {
      display: inline-flex;
      align-items: center;
      justify-content: center;
      width: 32px;
      height: 32px;
      border-radius: 999px;
      background: var(--line);
      font-weight: 600;
      font-size: 0.85rem;
    }

    .grow {
      flex: 1;
      min-width: 0;
    }

    .name {
      font-weight: 500;
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
    }

    .track {
      margin-top: 8px;
      height: 8px;
      border-radius: 999px;
      background: var(--line);
      overflow: hidden;
    }

    .fill {
      height: 8px;
      border-radius: 999px;
      background: var(--bar);
    }

    .notice {
      max-width: 640px;
      margin: 0 auto;
      text-align: center;
      display: grid;
      gap: 8px;
      justify-items: center;
    }

    .notice.error h3 {
      color: var(--error);
    }

    .badge {
      width: 96px;
      height: 96px;
      border-radius: 999px;
      background: var(--line);
      display: grid;
      place-items: center;
      font-size: 2rem;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      background: var(--ink);
      color: white;
      cursor: pointer;
    }

    .skeleton {
      display: grid;
      gap: 24px;
    }

    .bone {
      display: block;
      height: 32px;
      border-radius: 8px;
      background: #e5e7eb;
      animation: pulse 1.2s ease-in-out infinite;
    }

    .bone.short {
      width: 96px;
      height: 16px;
    }

    .bone.title {
      width: 256px;
    }

    .bone.line {
      height: 24px;
    }

    .bone.chart {
      height: 300px;
    }

    @keyframes pulse {
      50% {
        opacity: 0.5;
      }
    }

    @media (max-width: 900px) {
      .columns {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <nav>
    <a href="/">Estadísticas</a>
    <a href="/compras">Compras</a>
  </nav>
  <main>
{{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurrencyConfig;
    use crate::models::{NormalizedMonthlySales, NormalizedProduct, RankedList, SeriesPoint};

    fn money() -> CurrencyFormatter {
        CurrencyFormatter::new(&CurrencyConfig::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    fn sample_view() -> DashboardView {
        DashboardView {
            total_sales: 1_500_000.0,
            products: vec![NormalizedProduct {
                name: "Bota X".to_string(),
                quantity: 40,
                brand: String::new(),
                image_ref: String::new(),
            }],
            monthly: vec![
                NormalizedMonthlySales {
                    month_label: "Ene 2025".to_string(),
                    amount: 500_000.0,
                },
                NormalizedMonthlySales {
                    month_label: "Feb 2025".to_string(),
                    amount: 1_000_000.0,
                },
            ],
            average_monthly: 750_000.0,
            max_product_quantity: 40,
        }
    }

    #[test]
    fn loaded_statistics_page() {
        let state = FetchState::Loaded(PanelData::Statistics(sample_view()));
        let html = render_statistics(&state, &money(), today());

        assert!(html.contains("$ 1.500.000"));
        assert!(html.contains("$ 750.000"));
        assert!(html.contains(">Ene 2025</text>"));
        assert!(html.contains(">Feb 2025</text>"));
        assert!(html.contains("2 puntos"));
        assert!(html.contains("Actualizado 09/03/2025"));
        assert!(html.contains("width: 100.00%"));
        assert_eq!(html.matches("<li>").count(), 1);
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn loading_page_is_a_self_refreshing_skeleton() {
        let html = render_statistics(&FetchState::Loading, &money(), today());
        assert!(html.contains("aria-busy=\"true\""));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn empty_and_failed_pages_differ() {
        let empty = render_statistics(&FetchState::Empty, &money(), today());
        let failed = render_statistics(&FetchState::Failed, &money(), today());

        assert!(empty.contains("No hay datos de estadísticas"));
        assert!(!empty.contains("No se pudieron cargar"));
        assert!(failed.contains("No se pudieron cargar los datos"));
        assert!(failed.contains(r#"action="/refresh""#));
    }

    #[test]
    fn empty_product_list_says_no_records() {
        let mut view = sample_view();
        view.products.clear();
        view.max_product_quantity = 1;
        let html = render_statistics(&FetchState::Loaded(PanelData::Statistics(view)), &money(), today());
        assert!(html.contains("Sin registros"));
    }

    #[test]
    fn purchases_page_ranks_rows() {
        let list = RankedList {
            rows: vec![
                RankedRow {
                    name: "Bota".to_string(),
                    quantity: 5,
                },
                RankedRow {
                    name: "<script>".to_string(),
                    quantity: 10,
                },
            ],
            max_quantity: 10,
        };
        let html = render_purchases(&FetchState::Loaded(PanelData::Purchases(list)));

        assert!(html.contains("width: 50.00%"));
        assert!(html.contains("width: 100.00%"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"action="/compras/refresh""#));
    }

    #[test]
    fn product_page_draws_a_line_chart() {
        let series = ProductSeries {
            product_id: "a b".to_string(),
            points: vec![SeriesPoint {
                label: "14 Ago 2025".to_string(),
                quantity: 3,
            }],
            total_quantity: 3,
            average_quantity: 3.0,
        };
        let html = render_product_sales(
            &FetchState::Loaded(PanelData::ProductSales(series)),
            "a b",
        );

        assert!(html.contains("chart-line"));
        assert!(html.contains("14 Ago 2025"));
        assert!(html.contains(r#"action="/productos/a%20b/refresh""#));
    }

    #[test]
    fn product_paths_are_percent_encoded() {
        let source = DataSource::ProductSales("zapato/azul ñ?".to_string());
        assert_eq!(page_path(&source), "/productos/zapato%2Fazul%20%C3%B1%3F");
        assert_eq!(refresh_path(&source), "/productos/zapato%2Fazul%20%C3%B1%3F/refresh");
        assert_eq!(page_path(&DataSource::ProductSales("a-b_c.7~".to_string())), "/productos/a-b_c.7~");
        assert_eq!(refresh_path(&DataSource::Statistics), "/refresh");
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
