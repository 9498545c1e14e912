//! Request text sent to the model
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

const SHAPE_GUIDE: &str = r#"The response must be a single valid JSON object with these properties:
{
  "title": "Algorithm Name",
  "description": "Brief explanation",
  "difficulty": "Easy|Medium|Hard",
  "category": "Array|Tree|Graph|LinkedList|HashTable|Recursion|Sorting|Searching|DP",
  "timeComplexity": {"best": "O(...)", "average": "O(...)", "worst": "O(...)", "space": "O(...)"},
  "keyPoints": ["Important concept"],
  "pseudocode": "Step-by-step pseudocode",
  "code": {
    "language": "python|javascript|cpp|java",
    "content": "Code implementation",
    "lineMapping": {"1": "What line 1 does"}
  },
  "steps": [
    {
      "description": "Explanation of this step",
      "codeLine": 1,
      "visualElements": [],
      "memoryModel": {"stack": [], "heap": [], "global": []}
    }
  ]
}

Every step must have a "visualElements" array. Supported element shapes:
{"type": "array", "value": [1, 2, 3], "highlight": [0], "pointers": {"left": 0, "right": 2}}
{"type": "tree", "nodes": [{"id": 1, "value": 50, "x": 0, "y": 0}], "edges": [{"from": 1, "to": 2}], "highlight": [1], "traversalPath": [1]}
{"type": "graph", "nodes": [{"id": 1, "value": "A", "x": 0, "y": 0}], "edges": [{"from": 1, "to": 2, "weight": 5}], "highlight": [1], "visited": [1], "directed": false}
{"type": "linkedList", "nodes": [{"id": 1, "value": 5, "next": 2, "prev": null}], "highlight": [1]}
{"type": "hashTable", "buckets": [{"entries": [{"key": "a", "value": 1}]}], "highlight": [0]}
{"type": "recursion", "stackFrames": [{"name": "fib(5)", "variables": {"n": 5}}], "currentFrame": 0}
{"type": "text", "value": "Explanation text"}

Tree and graph nodes must carry explicit x/y coordinates, and every edge
must reference node ids that exist in the same element.
Memory model frames look like {"frame": "main", "variables": {"x": 5}},
heap cells like {"address": "0x1", "value": 1}, globals like {"name": "MAX", "value": 100}.

Return only JSON that can be parsed directly."#;

/// Prompt asking the model for a trace of `problem`
pub fn build_visualization_prompt(problem: &str) -> String {
    format!(
        "Create a detailed algorithm visualization in JSON format for: {}.\n\
         Include time complexity analysis, detailed explanations, and code execution steps.\n\n\
         {SHAPE_GUIDE}",
        problem.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_problem_and_shape() {
        let prompt = build_visualization_prompt("  merge sort ");
        assert!(prompt.contains("for: merge sort."));
        assert!(prompt.contains("\"visualElements\""));
    }
}
