fn main() {
    examtrack_lib::run()
}
