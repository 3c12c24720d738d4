fn main() {
    flags_ui::mount();
}
