fn main() -> anyhow::Result<()> {
    vocab_viewer::run()
}
