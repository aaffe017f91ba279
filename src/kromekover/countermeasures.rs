//! Versioned table of fingerprint countermeasures
//!
//! Each countermeasure is one self-contained script registered with
//! `Page.addScriptToEvaluateOnNewDocument`. Scripts are templates: `{{key}}`
//! placeholders are filled from the session's `StealthProfile`, so no shared
//! global is left on `window`.

use super::config::StealthProfile;

/// Bump when a script changes observable behaviour
pub const TABLE_VERSION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Countermeasure {
    /// Remove ChromeDriver `cdc_` globals
    CdpVariables,
    /// `navigator.webdriver` reads as unset
    NavigatorWebdriver,
    /// Non-empty plugin list, like a desktop Chrome
    NavigatorPlugins,
    /// `navigator.languages` matches Accept-Language
    NavigatorLanguages,
    /// Notification permission query agrees with `Notification.permission`
    PermissionsQuery,
    /// `window.chrome` with runtime/app stubs
    ChromeRuntime,
    /// Unmasked WebGL vendor/renderer of a real GPU
    WebglVendor,
    /// 24-bit screen and desktop screen size
    ScreenMetrics,
    HardwareConcurrency,
}

/// How many countermeasures a session installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealthLevel {
    /// Only the automation flag; used when stealth mode is off
    Baseline,
    /// Every entry of the table
    Full,
}

impl StealthLevel {
    #[must_use]
    pub fn from_stealth_mode(enabled: bool) -> Self {
        if enabled { Self::Full } else { Self::Baseline }
    }

    /// Countermeasures in injection order
    #[must_use]
    pub fn countermeasures(self) -> &'static [Countermeasure] {
        match self {
            Self::Baseline => &[Countermeasure::NavigatorWebdriver],
            Self::Full => Countermeasure::ALL,
        }
    }
}

impl Countermeasure {
    /// Full table in injection order; CDP cleanup runs before anything reads globals
    pub const ALL: &'static [Countermeasure] = &[
        Self::CdpVariables,
        Self::NavigatorWebdriver,
        Self::NavigatorPlugins,
        Self::NavigatorLanguages,
        Self::PermissionsQuery,
        Self::ChromeRuntime,
        Self::WebglVendor,
        Self::ScreenMetrics,
        Self::HardwareConcurrency,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CdpVariables => "cdp_variables",
            Self::NavigatorWebdriver => "navigator_webdriver",
            Self::NavigatorPlugins => "navigator_plugins",
            Self::NavigatorLanguages => "navigator_languages",
            Self::PermissionsQuery => "permissions_query",
            Self::ChromeRuntime => "chrome_runtime",
            Self::WebglVendor => "webgl_vendor",
            Self::ScreenMetrics => "screen_metrics",
            Self::HardwareConcurrency => "hardware_concurrency",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::CdpVariables => CDP_VARIABLES_JS,
            Self::NavigatorWebdriver => NAVIGATOR_WEBDRIVER_JS,
            Self::NavigatorPlugins => NAVIGATOR_PLUGINS_JS,
            Self::NavigatorLanguages => NAVIGATOR_LANGUAGES_JS,
            Self::PermissionsQuery => PERMISSIONS_QUERY_JS,
            Self::ChromeRuntime => CHROME_RUNTIME_JS,
            Self::WebglVendor => WEBGL_VENDOR_JS,
            Self::ScreenMetrics => SCREEN_METRICS_JS,
            Self::HardwareConcurrency => HARDWARE_CONCURRENCY_JS,
        }
    }

    /// Script source with the profile's values substituted
    #[must_use]
    pub fn render(self, profile: &StealthProfile) -> String {
        let languages =
            serde_json::to_string(&profile.languages).unwrap_or_else(|_| "[]".to_string());
        self.template()
            .replace("{{languages}}", &languages)
            .replace("{{webgl_vendor}}", &js_string(&profile.webgl_vendor))
            .replace("{{webgl_renderer}}", &js_string(&profile.webgl_renderer))
            .replace("{{screen_width}}", &profile.screen_width.to_string())
            .replace("{{screen_height}}", &profile.screen_height.to_string())
            .replace(
                "{{hardware_concurrency}}",
                &profile.hardware_concurrency.to_string(),
            )
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

const CDP_VARIABLES_JS: &str = r"
(() => {
    for (const key of Object.getOwnPropertyNames(window)) {
        if (/^\$?cdc_[a-zA-Z0-9]+_/.test(key)) {
            try { delete window[key]; } catch (e) {}
        }
    }
})();
";

const NAVIGATOR_WEBDRIVER_JS: &str = r"
Object.defineProperty(Navigator.prototype, 'webdriver', {
    get: () => undefined,
    configurable: true,
});
";

const NAVIGATOR_PLUGINS_JS: &str = r"
(() => {
    const mockPlugins = [
        { name: 'Chrome PDF Plugin', description: 'Portable Document Format', filename: 'internal-pdf-viewer' },
        { name: 'Chrome PDF Viewer', description: '', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai' },
        { name: 'Native Client', description: '', filename: 'internal-nacl-plugin' },
    ];
    const pluginsProto = Object.getPrototypeOf(navigator.plugins);
    Object.defineProperty(Navigator.prototype, 'plugins', {
        get: () => {
            const plugins = {};
            mockPlugins.forEach((plugin, i) => {
                plugins[i] = plugin;
                plugins[plugin.name] = plugin;
            });
            Object.setPrototypeOf(plugins, pluginsProto);
            Object.defineProperty(plugins, 'length', { value: mockPlugins.length });
            return plugins;
        },
        configurable: true,
    });
})();
";

const NAVIGATOR_LANGUAGES_JS: &str = r"
Object.defineProperty(Navigator.prototype, 'languages', {
    get: () => {{languages}},
    configurable: true,
});
";

const PERMISSIONS_QUERY_JS: &str = r"
(() => {
    if (!window.navigator.permissions) return;
    const originalQuery = window.navigator.permissions.query.bind(window.navigator.permissions);
    window.navigator.permissions.query = (parameters) => (
        parameters && parameters.name === 'notifications'
            ? Promise.resolve({ state: Notification.permission })
            : originalQuery(parameters)
    );
})();
";

const CHROME_RUNTIME_JS: &str = r"
(() => {
    if (!window.chrome) {
        window.chrome = {};
    }
    if (!window.chrome.runtime) {
        window.chrome.runtime = {
            connect: () => ({
                onMessage: { addListener: () => {}, removeListener: () => {} },
                postMessage: () => {},
            }),
        };
    }
    if (!window.chrome.app) {
        window.chrome.app = { isInstalled: false };
    }
    window.chrome.loadTimes = window.chrome.loadTimes || function() {};
    window.chrome.csi = window.chrome.csi || function() {};
})();
";

const WEBGL_VENDOR_JS: &str = r"
(() => {
    const handler = {
        apply: function(target, ctx, args) {
            const param = (args && args[0]) || null;
            // UNMASKED_VENDOR_WEBGL
            if (param === 37445) return {{webgl_vendor}};
            // UNMASKED_RENDERER_WEBGL
            if (param === 37446) return {{webgl_renderer}};
            return Reflect.apply(target, ctx, args);
        },
    };
    for (const ctx of [window.WebGLRenderingContext, window.WebGL2RenderingContext]) {
        if (ctx) {
            ctx.prototype.getParameter = new Proxy(ctx.prototype.getParameter, handler);
        }
    }
})();
";

const SCREEN_METRICS_JS: &str = r"
(() => {
    const define = (name, value) =>
        Object.defineProperty(Screen.prototype, name, { get: () => value, configurable: true });
    define('colorDepth', 24);
    define('pixelDepth', 24);
    define('width', {{screen_width}});
    define('height', {{screen_height}});
    define('availWidth', {{screen_width}});
    define('availHeight', {{screen_height}});
})();
";

const HARDWARE_CONCURRENCY_JS: &str = r"
Object.defineProperty(Navigator.prototype, 'hardwareConcurrency', {
    get: () => {{hardware_concurrency}},
    configurable: true,
});
";
