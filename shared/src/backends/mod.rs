cfg_if! {
    if #[cfg(all(target_arch = "wasm32", feature = "wbindgen"))] {
        mod wbindgen;
        pub use self::wbindgen::instant::Instant;
    }
    else {
        mod native;
        pub use native::instant::Instant;
    }
}
