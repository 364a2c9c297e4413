//! Built-in default typing rule.
//!
//! Keymaps follow the conventional SKK bindings; the rom-kana table covers
//! the standard romaji transcription including youon, geminates and the
//! z-prefixed symbol sequences.

pub(super) const DEFAULT_TOML: &str = r#"
description = "Default romaji typing rule"

[keymap.kana]
"C-g" = "abort"
"ESC" = "abort-to-latin"
"RET" = "commit"
"C-m" = "commit"
"C-j" = "hiragana-mode"
"DEL" = "delete"
"C-h" = "delete"
"SPC" = "convert"
"TAB" = "complete"
"q" = "toggle-kana"
"C-q" = "toggle-hankaku-kana"
"l" = "latin-mode"
"L" = "wide-latin-mode"
"/" = "abbrev-mode"
"\\" = "codepoint-mode"
"Q" = "start-composition"
"x" = "previous-candidate"
"X" = "purge-candidate"
"Up" = "candidate-up"
"Down" = "candidate-down"
"PageUp" = "candidate-page-up"
"PageDown" = "candidate-page-down"
"Right" = "surrounding-right"

[keymap.latin]
"C-j" = "hiragana-mode"

[keymap.wide-latin]
"C-j" = "hiragana-mode"

[keymap.abbrev]
"C-g" = "abort"
"RET" = "commit"
"C-m" = "commit"
"C-j" = "hiragana-mode"
"DEL" = "delete"
"C-h" = "delete"
"SPC" = "convert"
"TAB" = "complete"
"C-q" = "toggle-hankaku-kana"

[rom-kana]
a = "あ"
i = "い"
u = "う"
e = "え"
o = "お"

ka = "か"
ki = "き"
ku = "く"
ke = "け"
ko = "こ"
kya = "きゃ"
kyi = "きぃ"
kyu = "きゅ"
kye = "きぇ"
kyo = "きょ"

sa = "さ"
si = "し"
su = "す"
se = "せ"
so = "そ"
sha = "しゃ"
shi = "し"
shu = "しゅ"
she = "しぇ"
sho = "しょ"
sya = "しゃ"
syi = "しぃ"
syu = "しゅ"
sye = "しぇ"
syo = "しょ"

ta = "た"
ti = "ち"
tu = "つ"
te = "て"
to = "と"
tsa = "つぁ"
tsi = "つぃ"
tsu = "つ"
tse = "つぇ"
tso = "つぉ"
tya = "ちゃ"
tyi = "ちぃ"
tyu = "ちゅ"
tye = "ちぇ"
tyo = "ちょ"
cha = "ちゃ"
chi = "ち"
chu = "ちゅ"
che = "ちぇ"
cho = "ちょ"
tha = "てゃ"
thi = "てぃ"
thu = "てゅ"
the = "てぇ"
tho = "てょ"

n = "ん"
"n'" = "ん"
nn = "ん"
na = "な"
ni = "に"
nu = "ぬ"
ne = "ね"
no = "の"
nya = "にゃ"
nyi = "にぃ"
nyu = "にゅ"
nye = "にぇ"
nyo = "にょ"

ha = "は"
hi = "ひ"
hu = "ふ"
he = "へ"
ho = "ほ"
hya = "ひゃ"
hyi = "ひぃ"
hyu = "ひゅ"
hye = "ひぇ"
hyo = "ひょ"
fa = "ふぁ"
fi = "ふぃ"
fu = "ふ"
fe = "ふぇ"
fo = "ふぉ"
fya = "ふゃ"
fyu = "ふゅ"
fyo = "ふょ"

ma = "ま"
mi = "み"
mu = "む"
me = "め"
mo = "も"
mya = "みゃ"
myi = "みぃ"
myu = "みゅ"
mye = "みぇ"
myo = "みょ"

ya = "や"
yi = "い"
yu = "ゆ"
ye = "いぇ"
yo = "よ"

ra = "ら"
ri = "り"
ru = "る"
re = "れ"
ro = "ろ"
rya = "りゃ"
ryi = "りぃ"
ryu = "りゅ"
rye = "りぇ"
ryo = "りょ"

wa = "わ"
wi = "うぃ"
wu = "う"
we = "うぇ"
wo = "を"
wha = "うぁ"
whi = "うぃ"
whu = "う"
whe = "うぇ"
who = "うぉ"

ga = "が"
gi = "ぎ"
gu = "ぐ"
ge = "げ"
go = "ご"
gya = "ぎゃ"
gyi = "ぎぃ"
gyu = "ぎゅ"
gye = "ぎぇ"
gyo = "ぎょ"

za = "ざ"
zi = "じ"
zu = "ず"
ze = "ぜ"
zo = "ぞ"
zya = "じゃ"
zyi = "じぃ"
zyu = "じゅ"
zye = "じぇ"
zyo = "じょ"
ja = "じゃ"
ji = "じ"
ju = "じゅ"
je = "じぇ"
jo = "じょ"
jya = "じゃ"
jyi = "じぃ"
jyu = "じゅ"
jye = "じぇ"
jyo = "じょ"

da = "だ"
di = "ぢ"
du = "づ"
de = "で"
do = "ど"
dya = "ぢゃ"
dyi = "ぢぃ"
dyu = "ぢゅ"
dye = "ぢぇ"
dyo = "ぢょ"
dha = "でゃ"
dhi = "でぃ"
dhu = "でゅ"
dhe = "でぇ"
dho = "でょ"

ba = "ば"
bi = "び"
bu = "ぶ"
be = "べ"
bo = "ぼ"
bya = "びゃ"
byi = "びぃ"
byu = "びゅ"
bye = "びぇ"
byo = "びょ"

pa = "ぱ"
pi = "ぴ"
pu = "ぷ"
pe = "ぺ"
po = "ぽ"
pya = "ぴゃ"
pyi = "ぴぃ"
pyu = "ぴゅ"
pye = "ぴぇ"
pyo = "ぴょ"

va = "う゛ぁ"
vi = "う゛ぃ"
vu = "う゛"
ve = "う゛ぇ"
vo = "う゛ぉ"

xa = "ぁ"
xi = "ぃ"
xu = "ぅ"
xe = "ぇ"
xo = "ぉ"
xya = "ゃ"
xyu = "ゅ"
xyo = "ょ"
xtu = "っ"
xtsu = "っ"
xwa = "ゎ"
xka = "ヵ"
xke = "ヶ"

bb = ["っ", "b"]
cc = ["っ", "c"]
dd = ["っ", "d"]
ff = ["っ", "f"]
gg = ["っ", "g"]
hh = ["っ", "h"]
jj = ["っ", "j"]
kk = ["っ", "k"]
mm = ["っ", "m"]
pp = ["っ", "p"]
rr = ["っ", "r"]
ss = ["っ", "s"]
tt = ["っ", "t"]
vv = ["っ", "v"]
ww = ["っ", "w"]
xx = ["っ", "x"]
yy = ["っ", "y"]
zz = ["っ", "z"]

"-" = "ー"
"." = "。"
"," = "、"
"[" = "「"
"]" = "」"
"z-" = "〜"
"z," = "‥"
"z." = "…"
"z/" = "・"
"z[" = "『"
"z]" = "』"
"zh" = "←"
"zj" = "↓"
"zk" = "↑"
"zl" = "→"
"#;
