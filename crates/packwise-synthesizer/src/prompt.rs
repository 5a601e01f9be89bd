//! Prompt engineering for packing-list generation

/// Builds the single generation prompt for a trip
pub struct PromptBuilder {
    destination: String,
    days: u32,
    summary: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(destination: impl Into<String>, days: u32, summary: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            days,
            summary: summary.into(),
        }
    }

    /// Cap the grounding summary at `max_chars` characters
    pub fn with_summary_limit(mut self, max_chars: usize) -> Self {
        if let Some((cut, _)) = self.summary.char_indices().nth(max_chars) {
            self.summary.truncate(cut);
        }
        self
    }

    /// Build the complete generation prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role
        prompt.push_str(ROLE);
        prompt.push_str("\n\n");

        // 2. Trip parameters
        prompt.push_str("### 入力情報\n");
        prompt.push_str(&format!("- **旅行先**: {}\n", self.destination));
        prompt.push_str(&format!("- **日数**: {}日\n\n", self.days));

        // 3. Grounding text
        prompt.push_str("### 旅行の準備に関する回答\n");
        prompt.push_str(&self.summary);
        prompt.push_str("\n\n");

        // 4. Rules
        prompt.push_str(&self.rules());
        prompt.push('\n');

        // 5. Output example
        prompt.push_str(&self.example());

        prompt
    }

    fn rules(&self) -> String {
        let days = self.days;
        format!(
            "### 指示
1. 上記の情報を基に、具体的な荷物リストを作成してください。
2. **日数 ({days}日) を考慮して、各荷物の「個数」を決定してください。**
   - 歯ブラシや下着のように「一人一つ」必要な消耗品は、1日あたりの必要数に日数 ({days}) を掛け合わせてください。
   - 傘や日焼け止めのように共有できるものは「1」としてください。
   - 日数で単純に増えないもの（例：パスポート）は、適切な個数（通常は1）を判断してください。
3. 提供情報に含まれていなくとも、一般的に旅行に必要な物も必ず含めてください。
   - 下着、Tシャツ、ズボン、靴下など
4. 出力は、以下のキーを持つJSONオブジェクトのみにしてください。説明文や```jsonマークは不要です。
   - `packing_list`: 荷物オブジェクトのリスト。各オブジェクトは `item` (品名) と `quantity` (個数:Int型) のキーを持つ。
"
        )
    }

    fn example(&self) -> String {
        format!(
            r#"### 出力例
{{
  "packing_list": [
    {{ "item": "Tシャツ", "quantity": {days} }},
    {{ "item": "パスポート", "quantity": 1 }},
    {{ "item": "日焼け止め", "quantity": 1 }}
  ]
}}
"#,
            days = self.days
        )
    }
}

const ROLE: &str = "あなたは非常に優秀な旅行プランナーです。
以下の「旅行の準備に関する回答」を注意深く読み、旅行の荷物リストをJSON形式で生成してください。";
