use std::fs;

const SECTIONS: [&str; 3] = ["markdown", "output", "unsupported"];

fn main() {
    // The shipped defaults are embedded with include_str!, check them here
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in SECTIONS {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{}] section", section);
        }
    }

    let policy = table["unsupported"].get("policy").and_then(toml::Value::as_str);
    if !matches!(policy, Some("reject") | Some("drop")) {
        panic!("default_config.toml has an invalid unsupported.policy: {:?}", policy);
    }
}
