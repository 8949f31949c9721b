//! JavaScript glue between LiveView client hooks and the wasm exports.

/// Global the page assigns the initialized wasm module to.
pub const SHIM_GLOBAL: &str = "ReaderBridge";

/// Builds `window.ReaderHooks`, one LiveView hook object per hook kind.
///
/// Load it after the wasm module and pass `window.ReaderHooks` as `hooks` to
/// the `LiveSocket`. Each hook object forwards its lifecycle callbacks to the
/// handle returned by `mountHook`.
pub const HOOKS_SHIM: &str = r#"
(function() {
    // Reader bridge hooks
    function bridgeHook(name) {
        return {
            mounted: function() {
                var bridge = window.ReaderBridge;
                if (!bridge) {
                    console.warn("reader bridge not loaded, " + name + " disabled");
                    return;
                }
                try {
                    this.__readerHook = bridge.mountHook(name, this);
                } catch (e) {
                    console.warn("reader bridge: " + e);
                }
            },
            updated: function() {
                if (this.__readerHook) {
                    this.__readerHook.updated();
                }
            },
            destroyed: function() {
                if (this.__readerHook) {
                    this.__readerHook.destroyed();
                    this.__readerHook.free();
                    this.__readerHook = null;
                }
            }
        };
    }

    window.ReaderHooks = {
        FullscreenHook: bridgeHook("FullscreenHook"),
        ResponsiveImageHook: bridgeHook("ResponsiveImageHook"),
        ScrollToTop: bridgeHook("ScrollToTop")
    };
})();
"#;
