use koin_graph::{Config, ModuleFinder};

fn main() -> anyhow::Result<()> {
    println!("koin-graph Configuration Example");
    println!("================================");

    match Config::default_config_path() {
        Ok(path) => println!("📍 Default config location: {}", path.display()),
        Err(e) => println!("❌ Error getting config path: {}", e),
    }

    println!("\n🔧 Loading configuration...");
    let config = Config::load()?;

    println!("✅ Configuration loaded successfully!");
    println!("📁 Target directory: {}", config.target_directory.display());
    println!("🔍 File extensions: {:?}", config.file_extensions);
    println!("🚫 Ignore patterns: {:?}", config.ignore_patterns);
    println!("📏 Max file size: {} bytes", config.max_file_size);

    let finder = ModuleFinder::new(config)?;
    println!("\n📦 First module files:");
    for path in finder.find_module_files().take(5) {
        println!("   - {}", path.display());
    }

    Ok(())
}
