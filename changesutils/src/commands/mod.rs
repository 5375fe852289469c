mod changes2vcf;

pub use changes2vcf::Changes2Vcf;
