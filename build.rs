fn main() {
    // Embed the manifest declaring per-monitor DPI awareness. Without it,
    // GetWindowRect reports virtualized coordinates on scaled displays and
    // the captured bitmap no longer matches the window's physical pixels.
    let _ = embed_resource::compile("snapwin.rc", embed_resource::NONE);
}
