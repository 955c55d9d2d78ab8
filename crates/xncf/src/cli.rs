use std::fmt::Write;

use xncf_core::InstallationResult;
use xncf_core::storage::{MenuNode, ModuleRecord, PagedList};

/// Scan summary followed by the decision line.
pub fn render_installation(result: &InstallationResult) -> String {
    let mut out = String::new();
    for line in result.message.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    match result.decision {
        Some(decision) => {
            let _ = writeln!(out, "Decision: {} ({} module(s) changed)", decision, result.installed.len());
        }
        None => {
            let _ = writeln!(out, "Decision: none, nothing was installed or updated");
        }
    }
    out
}

/// One line per installed module, newest first.
pub fn render_records(page: &PagedList<ModuleRecord>) -> String {
    if page.is_empty() {
        return "No modules installed.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Installed modules (page {} of {}, {} total):",
        page.page_index,
        page.total_pages(),
        page.total_count
    );
    for record in page.iter() {
        let _ = writeln!(
            out,
            "  - {} v{} [{}] menu: {} installed: {}",
            record.name,
            record.version,
            record.uid,
            record.menu_id.as_deref().unwrap_or("none"),
            record.add_time.format("%Y-%m-%d %H:%M:%S")
        );
    }
    out
}

/// Menu nodes as an indented tree, siblings sorted by order then name.
pub fn render_menu_tree(menus: &[MenuNode]) -> String {
    if menus.is_empty() {
        return "No menus.\n".to_string();
    }
    let mut out = String::new();
    render_children(menus, None, 0, &mut out);
    out
}

fn render_children(menus: &[MenuNode], parent_id: Option<&str>, depth: usize, out: &mut String) {
    let mut children: Vec<&MenuNode> = menus
        .iter()
        .filter(|m| m.parent_id.as_deref() == parent_id)
        .collect();
    children.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

    for menu in children {
        let _ = writeln!(
            out,
            "{}- {} (order {}, icon {}){}",
            "  ".repeat(depth),
            menu.name,
            menu.order,
            menu.icon.as_deref().unwrap_or("none"),
            menu.path.as_deref().map(|p| format!(" -> {}", p)).unwrap_or_default()
        );
        render_children(menus, Some(&menu.id), depth + 1, out);
    }
}
