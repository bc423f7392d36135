fn main() {
    std::process::exit(funcgen_lib::run());
}
