//! Phrase-level and POS-conditioned polyphone resolution (§4.4, §9b).
//!
//! Many Chinese characters have more than one reading depending on context
//! (多音字). Resolution order is: phrase-table lookup (a word's pronunciation
//! is unambiguous once the surrounding word is known), then a POS-tag-keyed
//! default, then the trie's first-entry-wins fallback.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Multi-character phrases whose reading is fixed once the whole word is known.
    static ref PHRASE_PINYIN: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("行走", "xing2 zou3");
        m.insert("行人", "xing2 ren2");
        m.insert("行动", "xing2 dong4");
        m.insert("行为", "xing2 wei2");
        m.insert("执行", "zhi2 xing2");
        m.insert("进行", "jin4 xing2");
        m.insert("举行", "ju3 xing2");
        m.insert("银行", "yin2 hang2");
        m.insert("行业", "hang2 ye4");
        m.insert("行列", "hang2 lie4");
        m.insert("一行", "yi4 hang2");
        m.insert("同行", "tong2 hang2");
        m.insert("了解", "liao3 jie3");
        m.insert("了不起", "liao3 bu4 qi3");
        m.insert("了结", "liao3 jie2");
        m.insert("明了", "ming2 liao3");
        m.insert("受不了", "shou4 bu4 liao3");
        m.insert("得到", "de2 dao4");
        m.insert("取得", "qu3 de2");
        m.insert("获得", "huo4 de2");
        m.insert("得知", "de2 zhi1");
        m.insert("觉得", "jue2 de5");
        m.insert("地方", "di4 fang1");
        m.insert("地球", "di4 qiu2");
        m.insert("地区", "di4 qu1");
        m.insert("土地", "tu3 di4");
        m.insert("目的", "mu4 di4");
        m.insert("的确", "di2 que4");
        m.insert("还是", "hai2 shi4");
        m.insert("还有", "hai2 you3");
        m.insert("还要", "hai2 yao4");
        m.insert("归还", "gui1 huan2");
        m.insert("偿还", "chang2 huan2");
        m.insert("还原", "huan2 yuan2");
        m.insert("长城", "chang2 cheng2");
        m.insert("长度", "chang2 du4");
        m.insert("长期", "chang2 qi1");
        m.insert("长久", "chang2 jiu3");
        m.insert("成长", "cheng2 zhang3");
        m.insert("生长", "sheng1 zhang3");
        m.insert("增长", "zeng1 zhang3");
        m.insert("校长", "xiao4 zhang3");
        m.insert("部长", "bu4 zhang3");
        m.insert("市长", "shi4 zhang3");
        m.insert("重要", "zhong4 yao4");
        m.insert("重点", "zhong4 dian3");
        m.insert("重视", "zhong4 shi4");
        m.insert("重量", "zhong4 liang4");
        m.insert("重复", "chong2 fu4");
        m.insert("重新", "chong2 xin1");
        m.insert("快乐", "kuai4 le4");
        m.insert("欢乐", "huan1 le4");
        m.insert("音乐", "yin1 yue4");
        m.insert("乐器", "yue4 qi4");
        m.insert("教育", "jiao4 yu4");
        m.insert("教学", "jiao4 xue2");
        m.insert("教室", "jiao4 shi4");
        m.insert("宗教", "zong1 jiao4");
        m.insert("教书", "jiao1 shu1");
        m.insert("数字", "shu4 zi4");
        m.insert("数学", "shu4 xue2");
        m.insert("数量", "shu4 liang4");
        m.insert("数据", "shu4 ju4");
        m.insert("空气", "kong1 qi4");
        m.insert("空间", "kong1 jian1");
        m.insert("天空", "tian1 kong1");
        m.insert("空调", "kong1 tiao2");
        m.insert("有空", "you3 kong4");
        m.insert("差不多", "cha4 bu5 duo1");
        m.insert("差别", "cha1 bie2");
        m.insert("出差", "chu1 chai1");
        m.insert("困难", "kun4 nan2");
        m.insert("难过", "nan2 guo4");
        m.insert("难题", "nan2 ti2");
        m.insert("灾难", "zai1 nan4");
        m.insert("难民", "nan4 min2");
        m.insert("方便", "fang1 bian4");
        m.insert("便利", "bian4 li4");
        m.insert("便宜", "pian2 yi5");
        m.insert("高兴", "gao1 xing4");
        m.insert("兴趣", "xing4 qu4");
        m.insert("兴奋", "xing1 fen4");
        m.insert("复兴", "fu4 xing1");
        m.insert("朝代", "chao2 dai4");
        m.insert("朝向", "chao2 xiang4");
        m.insert("更加", "geng4 jia1");
        m.insert("更好", "geng4 hao3");
        m.insert("变更", "bian4 geng1");
        m.insert("处理", "chu3 li3");
        m.insert("到处", "dao4 chu4");
        m.insert("处于", "chu3 yu2");
        m.insert("调查", "diao4 cha2");
        m.insert("调整", "tiao2 zheng3");
        m.insert("调节", "tiao2 jie2");
        m.insert("声调", "sheng1 diao4");
        m.insert("西藏", "xi1 zang4");
        m.insert("收藏", "shou1 cang2");
        m.insert("隐藏", "yin3 cang2");
        m.insert("称呼", "cheng1 hu1");
        m.insert("称为", "cheng1 wei2");
        m.insert("名称", "ming2 cheng1");
        m.insert("对称", "dui4 chen4");
        m.insert("匀称", "yun2 chen4");
        m.insert("多少", "duo1 shao3");
        m.insert("减少", "jian3 shao3");
        m.insert("少年", "shao4 nian2");
        m.insert("少数", "shao3 shu4");
        m.insert("省份", "sheng3 fen4");
        m.insert("节省", "jie2 sheng3");
        m.insert("反省", "fan3 xing3");
        m.insert("相信", "xiang1 xin4");
        m.insert("相同", "xiang1 tong2");
        m.insert("相关", "xiang1 guan1");
        m.insert("照相", "zhao4 xiang4");
        m.insert("相机", "xiang4 ji1");
        m.insert("真相", "zhen1 xiang4");
        m.insert("你好", "ni3 hao3");
        m.insert("好的", "hao3 de5");
        m.insert("爱好", "ai4 hao4");
        m.insert("好奇", "hao4 qi2");
        m.insert("中国", "zhong1 guo2");
        m.insert("中间", "zhong1 jian1");
        m.insert("中心", "zhong1 xin1");
        m.insert("命中", "ming4 zhong4");
        m.insert("没有", "mei2 you3");
        m.insert("没关系", "mei2 guan1 xi5");
        m.insert("淹没", "yan1 mo4");
        m.insert("沉没", "chen2 mo4");
        m.insert("什么", "shen2 me5");
        m.insert("怎么", "zen3 me5");
        m.insert("那么", "na4 me5");
        m.insert("这么", "zhe4 me5");
        m.insert("为什么", "wei4 shen2 me5");
        m.insert("喜欢", "xi3 huan1");
        m.insert("知道", "zhi1 dao4");
        m.insert("可以", "ke3 yi3");
        m.insert("应该", "ying1 gai1");
        m.insert("需要", "xu1 yao4");
        m.insert("已经", "yi3 jing1");
        m.insert("虽然", "sui1 ran2");
        m.insert("但是", "dan4 shi4");
        m.insert("因为", "yin1 wei4");
        m.insert("所以", "suo3 yi3");
        m.insert("如果", "ru2 guo3");
        m.insert("这样", "zhe4 yang4");
        m.insert("那样", "na4 yang4");
        m.insert("非常", "fei1 chang2");
        m.insert("特别", "te4 bie2");
        m.insert("比较", "bi3 jiao4");
        m.insert("可能", "ke3 neng2");
        m.insert("必须", "bi4 xu1");
        m.insert("其实", "qi2 shi2");
        m.insert("现在", "xian4 zai4");
        m.insert("以后", "yi3 hou4");
        m.insert("以前", "yi3 qian2");
        m
    };

    /// (character, POS prefix) -> reading, for single characters whose
    /// pronunciation depends on grammatical role rather than phrase context.
    static ref POS_BASED_PINYIN: HashMap<(char, &'static str), &'static str> = {
        let mut m = HashMap::new();
        m.insert(('行', "v"), "xing2");
        m.insert(('行', "n"), "hang2");
        m.insert(('了', "v"), "liao3");
        m.insert(('了', "u"), "le5");
        m.insert(('得', "v"), "de2");
        m.insert(('得', "u"), "de5");
        m.insert(('地', "n"), "di4");
        m.insert(('地', "u"), "de5");
        m.insert(('还', "d"), "hai2");
        m.insert(('还', "v"), "huan2");
        m.insert(('长', "a"), "chang2");
        m.insert(('长', "v"), "zhang3");
        m.insert(('长', "n"), "zhang3");
        m.insert(('重', "a"), "zhong4");
        m.insert(('重', "d"), "chong2");
        m.insert(('乐', "a"), "le4");
        m.insert(('乐', "n"), "yue4");
        m.insert(('教', "n"), "jiao4");
        m.insert(('教', "v"), "jiao1");
        m.insert(('数', "n"), "shu4");
        m.insert(('数', "v"), "shu3");
        m
    };

    /// Most-common reading, used once phrase and POS tiers are exhausted.
    static ref DEFAULT_PINYIN: HashMap<char, &'static str> = {
        let mut m = HashMap::new();
        m.insert('行', "xing2");
        m.insert('了', "le5");
        m.insert('得', "de5");
        m.insert('地', "di4");
        m.insert('的', "de5");
        m.insert('还', "hai2");
        m.insert('长', "chang2");
        m.insert('重', "zhong4");
        m.insert('乐', "le4");
        m.insert('教', "jiao4");
        m.insert('数', "shu4");
        m.insert('空', "kong1");
        m.insert('差', "cha4");
        m.insert('难', "nan2");
        m.insert('便', "bian4");
        m.insert('兴', "xing4");
        m.insert('朝', "chao2");
        m.insert('更', "geng4");
        m.insert('处', "chu4");
        m.insert('调', "diao4");
        m.insert('藏', "cang2");
        m.insert('称', "cheng1");
        m.insert('少', "shao3");
        m.insert('省', "sheng3");
        m.insert('相', "xiang1");
        m.insert('好', "hao3");
        m.insert('中', "zhong1");
        m.insert('没', "mei2");
        m
    };
}

/// Phrase-table lookup: space-separated numeric-tone pinyin for the whole phrase.
pub fn lookup_phrase(phrase: &str) -> Option<&'static str> {
    PHRASE_PINYIN.get(phrase).copied()
}

/// POS-conditioned single-character lookup. Tries the exact tag, then its
/// first character as a coarse POS family (e.g. `"vn"` falls back to `"v"`).
pub fn lookup_with_pos(c: char, pos: &str) -> Option<&'static str> {
    if let Some(&pinyin) = POS_BASED_PINYIN.get(&(c, pos)) {
        return Some(pinyin);
    }
    if !pos.is_empty() {
        let prefix = &pos[..1];
        if let Some(&pinyin) = POS_BASED_PINYIN.get(&(c, prefix)) {
            return Some(pinyin);
        }
    }
    None
}

pub fn default_pinyin(c: char) -> Option<&'static str> {
    DEFAULT_PINYIN.get(&c).copied()
}

/// Resolve a single polyphonic character's reading given its phrase context
/// and POS tag, per the phrase → POS → default priority order.
pub fn resolve(word: &str, c: char, pos: &str) -> Option<&'static str> {
    if let Some(phrase_reading) = lookup_phrase(word) {
        return phrase_reading.split(' ').next();
    }
    lookup_with_pos(c, pos).or_else(|| default_pinyin(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_lookup_resolves_context_dependent_reading() {
        assert_eq!(lookup_phrase("银行"), Some("yin2 hang2"));
        assert_eq!(lookup_phrase("行走"), Some("xing2 zou3"));
        assert_eq!(lookup_phrase("不存在"), None);
    }

    #[test]
    fn pos_lookup_distinguishes_verb_from_noun() {
        assert_eq!(lookup_with_pos('行', "v"), Some("xing2"));
        assert_eq!(lookup_with_pos('行', "n"), Some("hang2"));
    }

    #[test]
    fn default_pinyin_is_most_common_reading() {
        assert_eq!(default_pinyin('行'), Some("xing2"));
        assert_eq!(default_pinyin('了'), Some("le5"));
    }

    #[test]
    fn resolve_prefers_phrase_over_pos_over_default() {
        assert_eq!(resolve("银行", '行', "v"), Some("yin2"));
        assert_eq!(resolve("不存在词", '行', "n"), Some("hang2"));
        assert_eq!(resolve("不存在词", '好', "x"), Some("hao3"));
    }
}
