use haldane_spectra::app::run;
fn main() {
    run().unwrap();
}
