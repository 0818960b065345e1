use console::style;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_current_tag(tag: &str) {
    println!("{} {}", style("Current tag:").bold(), tag);
}

pub fn display_new_tag(tag: &str) {
    println!("{} {}", style("New tag:").bold(), style(tag).green());
}
