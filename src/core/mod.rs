// Tree-mirroring core: archive paths plus the two recursive walks
pub mod compressor;
pub mod extractor;
pub mod path;
