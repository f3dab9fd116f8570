use anyhow::Result;

fn main() -> Result<()> {
    feedload::cli::execute()
}
