//! MIME type detection module
//!
//! Maps a file extension (leading dot included) to the Content-Type sent
//! with the file. The table is built once and only read afterwards.

use std::collections::HashMap;
use std::path::Path;

/// Content type for extensions missing from the table
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// WebAssembly modules must carry this type for streaming compilation
pub const WASM_EXTENSION: &str = ".wasm";
pub const WASM_CONTENT_TYPE: &str = "application/wasm";

/// Conventional extension associations of a generic static file server
const BASELINE_TYPES: &[(&str, &str)] = &[
    ("", DEFAULT_CONTENT_TYPE),
    // Text
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".txt", "text/plain"),
    (".bat", "text/plain"),
    (".c", "text/plain"),
    (".h", "text/plain"),
    (".ksh", "text/plain"),
    (".pl", "text/plain"),
    (".py", "text/plain"),
    (".csv", "text/csv"),
    (".tsv", "text/tab-separated-values"),
    (".rtx", "text/richtext"),
    (".etx", "text/x-setext"),
    (".sgm", "text/x-sgml"),
    (".sgml", "text/x-sgml"),
    (".vcf", "text/x-vcard"),
    (".xml", "text/xml"),
    (".md", "text/markdown"),
    // Scripts and data
    (".js", "application/javascript"),
    (".mjs", "application/javascript"),
    (".json", "application/json"),
    (".map", "application/json"),
    (".rdf", "application/xml"),
    (".wsdl", "application/xml"),
    (".xpdl", "application/xml"),
    (".xsl", "application/xml"),
    (".sh", "application/x-sh"),
    (".csh", "application/x-csh"),
    (".tcl", "application/x-tcl"),
    (".pyc", "application/x-python-code"),
    (".pyo", "application/x-python-code"),
    // Images
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".jpg", "image/jpeg"),
    (".jpe", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".svg", "image/svg+xml"),
    (".ico", "image/vnd.microsoft.icon"),
    (".bmp", "image/x-ms-bmp"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    (".webp", "image/webp"),
    (".ief", "image/ief"),
    (".pbm", "image/x-portable-bitmap"),
    (".pgm", "image/x-portable-graymap"),
    (".pnm", "image/x-portable-anymap"),
    (".ppm", "image/x-portable-pixmap"),
    (".ras", "image/x-cmu-raster"),
    (".rgb", "image/x-rgb"),
    (".xbm", "image/x-xbitmap"),
    (".xpm", "image/x-xpixmap"),
    (".xwd", "image/x-xwindowdump"),
    // Audio
    (".au", "audio/basic"),
    (".snd", "audio/basic"),
    (".aif", "audio/x-aiff"),
    (".aifc", "audio/x-aiff"),
    (".aiff", "audio/x-aiff"),
    (".mp2", "audio/mpeg"),
    (".mp3", "audio/mpeg"),
    (".ra", "audio/x-pn-realaudio"),
    (".wav", "audio/x-wav"),
    (".ogg", "audio/ogg"),
    // Video
    (".mp4", "video/mp4"),
    (".m1v", "video/mpeg"),
    (".mpa", "video/mpeg"),
    (".mpe", "video/mpeg"),
    (".mpeg", "video/mpeg"),
    (".mpg", "video/mpeg"),
    (".mov", "video/quicktime"),
    (".qt", "video/quicktime"),
    (".movie", "video/x-sgi-movie"),
    (".avi", "video/x-msvideo"),
    (".webm", "video/webm"),
    // Fonts
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    (".ttf", "font/ttf"),
    (".otf", "font/otf"),
    // Documents and archives
    (".pdf", "application/pdf"),
    (".ai", "application/postscript"),
    (".eps", "application/postscript"),
    (".ps", "application/postscript"),
    (".doc", "application/msword"),
    (".dot", "application/msword"),
    (".wiz", "application/msword"),
    (".xls", "application/vnd.ms-excel"),
    (".xlb", "application/vnd.ms-excel"),
    (".ppt", "application/vnd.ms-powerpoint"),
    (".pps", "application/vnd.ms-powerpoint"),
    (".pot", "application/vnd.ms-powerpoint"),
    (".ppa", "application/vnd.ms-powerpoint"),
    (".pwz", "application/vnd.ms-powerpoint"),
    (".eml", "message/rfc822"),
    (".mht", "message/rfc822"),
    (".mhtml", "message/rfc822"),
    (".nws", "message/rfc822"),
    (".dvi", "application/x-dvi"),
    (".latex", "application/x-latex"),
    (".tex", "application/x-tex"),
    (".texi", "application/x-texinfo"),
    (".texinfo", "application/x-texinfo"),
    (".roff", "application/x-troff"),
    (".t", "application/x-troff"),
    (".tr", "application/x-troff"),
    (".man", "application/x-troff-man"),
    (".me", "application/x-troff-me"),
    (".ms", "application/x-troff-ms"),
    (".zip", "application/zip"),
    (".gz", "application/gzip"),
    (".tar", "application/x-tar"),
    (".gtar", "application/x-gtar"),
    (".ustar", "application/x-ustar"),
    (".shar", "application/x-shar"),
    (".cpio", "application/x-cpio"),
    (".bcpio", "application/x-bcpio"),
    (".sv4cpio", "application/x-sv4cpio"),
    (".sv4crc", "application/x-sv4crc"),
    (".hdf", "application/x-hdf"),
    (".cdf", "application/x-netcdf"),
    (".nc", "application/x-netcdf"),
    (".mif", "application/x-mif"),
    (".oda", "application/oda"),
    (".p7c", "application/pkcs7-mime"),
    (".p12", "application/x-pkcs12"),
    (".pfx", "application/x-pkcs12"),
    (".src", "application/x-wais-source"),
    (".swf", "application/x-shockwave-flash"),
    // Binaries
    (".a", DEFAULT_CONTENT_TYPE),
    (".bin", DEFAULT_CONTENT_TYPE),
    (".dll", DEFAULT_CONTENT_TYPE),
    (".exe", DEFAULT_CONTENT_TYPE),
    (".o", DEFAULT_CONTENT_TYPE),
    (".obj", DEFAULT_CONTENT_TYPE),
    (".so", DEFAULT_CONTENT_TYPE),
];

/// Extension to Content-Type table
///
/// # Examples
/// ```
/// use devserve::http::mime::MimeTable;
/// let table = MimeTable::default();
/// assert_eq!(table.resolve(".html"), "text/html");
/// assert_eq!(table.resolve(".wasm"), "application/wasm");
/// assert_eq!(table.resolve(".xyz"), "application/octet-stream");
/// ```
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
}

impl MimeTable {
    /// Baseline table without the `.wasm` addition
    pub fn baseline() -> Self {
        let types = BASELINE_TYPES
            .iter()
            .map(|&(ext, ty)| (ext.to_string(), ty.to_string()))
            .collect();
        Self { types }
    }

    /// Baseline table, `.wasm`, then the configured extras (extras win)
    pub fn new(extra: &HashMap<String, String>) -> Self {
        let mut table = Self::baseline().with_type(WASM_EXTENSION, WASM_CONTENT_TYPE);
        for (ext, ty) in extra {
            table = table.with_type(ext, ty);
        }
        table
    }

    /// Add or replace one mapping
    #[must_use]
    pub fn with_type(mut self, extension: &str, content_type: &str) -> Self {
        self.types
            .insert(extension.to_string(), content_type.to_string());
        self
    }

    /// Resolve an extension such as `".wasm"`
    ///
    /// Lookup is exact first; an unmatched extension is retried in lower
    /// case before falling back to [`DEFAULT_CONTENT_TYPE`].
    pub fn resolve(&self, extension: &str) -> &str {
        if let Some(ty) = self.types.get(extension) {
            return ty;
        }
        self.types
            .get(&extension.to_lowercase())
            .map_or(DEFAULT_CONTENT_TYPE, String::as_str)
    }

    /// Resolve the Content-Type for a file path
    pub fn resolve_path(&self, path: &Path) -> &str {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.resolve(extension_of(&name))
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// Extension of a file name: from the last `.` to the end
///
/// Leading dots do not start an extension, so `.bashrc` and `..` have none.
pub fn extension_of(file_name: &str) -> &str {
    let Some(dot) = file_name.rfind('.') else {
        return "";
    };
    if file_name[..dot].bytes().all(|b| b == b'.') {
        return "";
    }
    &file_name[dot..]
}
