//! Region tree served by the demo loader

use cascade_picker_core::loaders::OptionNode;
use cascade_picker_core::CascadeResult;

const REGIONS: &str = r#"[
    { "text": "Guangxi", "value": "450000", "children": [
        { "text": "Nanning", "value": "450100", "children": [
            { "text": "Xingning", "value": "450102" },
            { "text": "Qingxiu", "value": "450103" }
        ] },
        { "text": "Liuzhou", "value": "450200", "children": [
            { "text": "Chengzhong", "value": "450202" },
            { "text": "Yufeng", "value": "450203" }
        ] }
    ] },
    { "text": "Guangdong", "value": "440000", "children": [
        { "text": "Guangzhou", "value": "440100", "children": [
            { "text": "Tianhe", "value": "440106" },
            { "text": "Yuexiu", "value": "440104" }
        ] },
        { "text": "Shenzhen", "value": "440300", "children": [
            { "text": "Futian", "value": "440304" },
            { "text": "Nanshan", "value": "440305" }
        ] }
    ] },
    { "text": "Hainan", "value": "460000", "children": [
        { "text": "Sansha", "value": "460300" }
    ] }
]"#;

pub fn region_tree() -> CascadeResult<Vec<OptionNode<String>>> {
    Ok(serde_json::from_str(REGIONS)?)
}
