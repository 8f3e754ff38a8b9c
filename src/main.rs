fn main() -> color_eyre::Result<()> {
    privx_secrets::cli::main()
}
