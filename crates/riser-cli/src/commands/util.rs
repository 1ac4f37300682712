/// Resolve a threading hint (`auto` or an integer) to a solver thread count.
pub fn resolve_threads(spec: &str) -> u32 {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.parse().unwrap_or_else(|_| num_cpus::get())
    };
    u32::try_from(count.max(1)).unwrap_or(u32::MAX)
}
