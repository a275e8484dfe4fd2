//! View renderers and small shared widgets.

pub mod filter_search;
pub mod ip_search;
pub mod login;
pub mod register;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
};

use crate::models::HostInfo;
use crate::ui::styles;

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// One labelled form field line with a cursor marker when focused
pub fn form_field(label: &str, value: &str, focused: bool) -> Line<'static> {
    let value_style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<9}[", format!("{}:", label)), styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), value_style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Detail lines for one host record, shared by both search views
pub fn host_detail_lines(host: &HostInfo) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];

    let field = |label: &str, value: String| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<12}", label), styles::muted_style()),
            Span::styled(value, styles::list_item_style()),
        ])
    };

    lines.push(field("IP", host.ip().to_string()));
    lines.push(field(
        "Organization",
        host.org.clone().unwrap_or_else(|| "-".to_string()),
    ));
    lines.push(field(
        "ISP",
        host.isp.clone().unwrap_or_else(|| "-".to_string()),
    ));
    lines.push(field(
        "OS",
        host.os.clone().unwrap_or_else(|| "-".to_string()),
    ));
    lines.push(field("Hostnames", host.hostname_display()));
    if !host.domains.is_empty() {
        lines.push(field("Domains", host.domains.join(", ")));
    }
    lines.push(field("Location", host.location.display()));
    lines.push(field("Last seen", host.timestamp_display()));

    if let Some(ref product) = host.product {
        let mut service = product.clone();
        if let Some(ref version) = host.version {
            service.push_str(&format!(" {}", version));
        }
        lines.push(field("Service", service));
    }

    let ports = host.port_list();
    if !ports.is_empty() {
        let ports = ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(field("Open ports", ports));
    }

    if !host.data.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Services",
            styles::title_style(),
        )));
        for banner in &host.data {
            lines.push(Line::from(Span::styled(
                format!("    {}", banner.display()),
                styles::list_item_style(),
            )));
        }
    }

    if !host.vulns.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Vulnerabilities ({})", host.vulns.len()),
            styles::error_style(),
        )));
        for vuln in &host.vulns {
            lines.push(Line::from(Span::styled(
                format!("    {}", vuln),
                styles::warning_style(),
            )));
        }
    }

    lines
}
