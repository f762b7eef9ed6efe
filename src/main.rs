use anyhow::Result;

fn main() -> Result<()> {
    postwash::cli::run()
}
